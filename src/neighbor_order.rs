//! Neighbor-order index: incident edges sorted by descending similarity.
//!
//! Per vertex, the ε-neighborhood at any threshold is a prefix of this
//! ordering, which is what makes repeated clustering queries cheap. Ties are
//! broken by ascending neighbor id to pin the ordering.

use rayon::prelude::*;

use crate::graph::CsrGraph;
use crate::similarity::EdgeSimilarity;

/// One incident edge as stored in the index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NeighborSim {
    pub neighbor: u32,
    pub similarity: f32,
}

pub struct NeighborOrder {
    offsets: Vec<u64>,
    edges: Vec<NeighborSim>,
}

impl NeighborOrder {
    pub(crate) fn build(graph: &CsrGraph, similarities: &[EdgeSimilarity]) -> Self {
        debug_assert_eq!(similarities.len(), graph.num_half_edges());
        let offsets = graph.offsets().to_vec();
        let mut edges: Vec<NeighborSim> = similarities
            .par_iter()
            .map(|e| NeighborSim {
                neighbor: e.neighbor,
                similarity: e.similarity,
            })
            .collect();
        split_by_offsets(&mut edges, &offsets)
            .into_par_iter()
            .for_each(|adjacency| {
                adjacency.sort_unstable_by(|a, b| {
                    b.similarity
                        .total_cmp(&a.similarity)
                        .then(a.neighbor.cmp(&b.neighbor))
                });
            });
        NeighborOrder { offsets, edges }
    }

    pub fn num_vertices(&self) -> u32 {
        (self.offsets.len() - 1) as u32
    }

    #[inline]
    pub fn degree(&self, v: u32) -> u32 {
        (self.offsets[v as usize + 1] - self.offsets[v as usize]) as u32
    }

    /// Incident edges of `v`, best similarity first.
    #[inline]
    pub fn edges(&self, v: u32) -> &[NeighborSim] {
        &self.edges[self.offsets[v as usize] as usize..self.offsets[v as usize + 1] as usize]
    }

    /// Number of incident edges with similarity at least `epsilon`.
    pub fn count_at_least(&self, v: u32, epsilon: f32) -> usize {
        self.edges(v)
            .partition_point(|e| e.similarity >= epsilon)
    }

    /// The ε-neighborhood of `v`: the maximal prefix with similarity at
    /// least `epsilon`.
    pub fn eps_prefix(&self, v: u32, epsilon: f32) -> &[NeighborSim] {
        let edges = self.edges(v);
        &edges[..edges.partition_point(|e| e.similarity >= epsilon)]
    }
}

/// Cut a slice into the per-vertex windows described by a CSR offset array.
pub(crate) fn split_by_offsets<'a, T>(mut data: &'a mut [T], offsets: &[u64]) -> Vec<&'a mut [T]> {
    let mut out = Vec::with_capacity(offsets.len().saturating_sub(1));
    let mut prev = 0u64;
    for &off in &offsets[1..] {
        let (head, tail) = data.split_at_mut((off - prev) as usize);
        out.push(head);
        data = tail;
        prev = off;
    }
    out
}
