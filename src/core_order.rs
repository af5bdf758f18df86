//! Core-order index: for which (μ, ε) is a vertex a core?
//!
//! A vertex is a core at (μ, ε) when its (μ−1)-th best incident similarity is
//! at least ε; the vertex itself supplies the μ-th closed-neighbor. The
//! index keeps one bucket per μ holding every vertex of degree ≥ μ−1 keyed by
//! that threshold similarity, sorted descending, so the cores of any ε are a
//! prefix found by binary search.

use rayon::prelude::*;

use crate::neighbor_order::{split_by_offsets, NeighborOrder};

/// A vertex paired with its (μ−1)-th best incident similarity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoreThreshold {
    pub vertex: u32,
    pub similarity: f32,
}

pub struct CoreOrder {
    max_mu: u32,
    offsets: Vec<u64>, // one bucket per μ in [2, max_mu]
    buckets: Vec<CoreThreshold>,
}

impl CoreOrder {
    pub(crate) fn build(order: &NeighborOrder) -> Self {
        let n = order.num_vertices();
        let degrees: Vec<u32> = (0..n).into_par_iter().map(|v| order.degree(v)).collect();
        let max_deg = degrees.par_iter().copied().max().unwrap_or(0);
        let num_buckets = max_deg as usize;
        if num_buckets == 0 {
            return CoreOrder {
                max_mu: 1,
                offsets: vec![0],
                buckets: Vec::new(),
            };
        }

        // bucket b (μ = b + 2) holds every vertex with deg >= b + 1
        let mut offsets = vec![0u64; num_buckets + 1];
        for &d in &degrees {
            for b in 0..d as usize {
                offsets[b + 1] += 1;
            }
        }
        for b in 0..num_buckets {
            offsets[b + 1] += offsets[b];
        }

        let total = offsets[num_buckets] as usize;
        let mut buckets = vec![
            CoreThreshold {
                vertex: 0,
                similarity: 0.0
            };
            total
        ];
        let mut cursors: Vec<usize> = offsets[..num_buckets]
            .iter()
            .map(|&o| o as usize)
            .collect();
        for v in 0..n {
            for (b, e) in order.edges(v).iter().enumerate() {
                buckets[cursors[b]] = CoreThreshold {
                    vertex: v,
                    similarity: e.similarity,
                };
                cursors[b] += 1;
            }
        }

        split_by_offsets(&mut buckets, &offsets)
            .into_par_iter()
            .for_each(|bucket| {
                bucket.sort_unstable_by(|a, b| {
                    b.similarity
                        .total_cmp(&a.similarity)
                        .then(a.vertex.cmp(&b.vertex))
                });
            });

        CoreOrder {
            max_mu: max_deg + 1,
            offsets,
            buckets,
        }
    }

    /// Largest μ any vertex can satisfy.
    pub fn max_mu(&self) -> u32 {
        self.max_mu
    }

    /// Every core at (μ, ε), best threshold similarity first.
    pub fn cores(&self, mu: u32, epsilon: f32) -> &[CoreThreshold] {
        if mu < 2 || mu > self.max_mu {
            return &[];
        }
        let b = (mu - 2) as usize;
        let bucket = &self.buckets[self.offsets[b] as usize..self.offsets[b + 1] as usize];
        &bucket[..bucket.partition_point(|c| c.similarity >= epsilon)]
    }
}
