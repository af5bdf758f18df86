//! Compact CSR storage for undirected simple graphs.
//!
//! The whole engine runs off two flat arrays: `offsets` (one slot per vertex
//! plus a terminator) and `neighbors` (one slot per directed half-edge). Every
//! adjacency list is sorted by ascending neighbor id, which the similarity
//! kernel relies on for merge-style intersections, and every edge appears as
//! two mirrored half-edges.

use rayon::prelude::*;

use crate::error::{Result, ScanError};

/// Undirected graph in compressed-sparse-row form.
///
/// Immutable after construction. A directed half-edge (v, `neighbors[k]`) is
/// addressed by its global slot `k` in `offsets[v]..offsets[v + 1]`; per-edge
/// results (similarities, shared-neighbor counts) are stored in arrays indexed
/// by the same slots.
#[derive(Debug, Clone)]
pub struct CsrGraph {
    offsets: Vec<u64>,   // num_vertices + 1
    neighbors: Vec<u32>, // 2 * num_edges, ascending per vertex
}

impl CsrGraph {
    /// Build from raw CSR arrays, validating every structural precondition:
    /// monotone offsets, sorted simple adjacency, mirrored half-edges.
    pub fn from_parts(offsets: Vec<u64>, neighbors: Vec<u32>) -> Result<CsrGraph> {
        if offsets.first() != Some(&0)
            || *offsets.last().unwrap_or(&u64::MAX) != neighbors.len() as u64
            || offsets.windows(2).any(|w| w[0] > w[1])
            || offsets.len() - 1 > u32::MAX as usize
        {
            return Err(ScanError::MalformedOffsets);
        }
        let graph = CsrGraph { offsets, neighbors };
        graph.validate()?;
        Ok(graph)
    }

    /// Build from an undirected edge list over vertices `0..n`.
    ///
    /// Symmetrizes, sorts, and deduplicates; self-loops are dropped. This is
    /// the ingest-side constructor, so it tolerates messy input where
    /// [`CsrGraph::from_parts`] rejects it.
    pub fn from_edges(n: u32, edges: &[(u32, u32)]) -> Result<CsrGraph> {
        let mut directed = Vec::with_capacity(edges.len() * 2);
        for &(u, v) in edges {
            if u >= n || v >= n {
                return Err(ScanError::EdgeOutOfRange { u, v, n });
            }
            if u == v {
                continue;
            }
            directed.push((u, v));
            directed.push((v, u));
        }
        directed.par_sort_unstable();
        directed.dedup();

        let mut offsets = vec![0u64; n as usize + 1];
        for &(u, _) in &directed {
            offsets[u as usize + 1] += 1;
        }
        for i in 0..n as usize {
            offsets[i + 1] += offsets[i];
        }
        let neighbors = directed.into_iter().map(|(_, v)| v).collect();
        Ok(CsrGraph { offsets, neighbors })
    }

    pub fn num_vertices(&self) -> u32 {
        (self.offsets.len() - 1) as u32
    }

    /// Undirected edge count.
    pub fn num_edges(&self) -> u64 {
        (self.neighbors.len() / 2) as u64
    }

    /// Directed half-edge count, i.e. the length of per-edge result arrays.
    pub fn num_half_edges(&self) -> usize {
        self.neighbors.len()
    }

    #[inline]
    pub fn degree(&self, v: u32) -> u32 {
        (self.offsets[v as usize + 1] - self.offsets[v as usize]) as u32
    }

    /// Neighbors of `v` in ascending id order.
    #[inline]
    pub fn neighbors(&self, v: u32) -> &[u32] {
        &self.neighbors[self.offsets[v as usize] as usize..self.offsets[v as usize + 1] as usize]
    }

    /// Global slot of the first half-edge out of `v`.
    #[inline]
    pub fn edge_offset(&self, v: u32) -> usize {
        self.offsets[v as usize] as usize
    }

    /// Position of `v` within `u`'s adjacency list, if the edge exists.
    #[inline]
    pub fn find_neighbor(&self, u: u32, v: u32) -> Option<usize> {
        self.neighbors(u).binary_search(&v).ok()
    }

    pub(crate) fn offsets(&self) -> &[u64] {
        &self.offsets
    }

    fn validate(&self) -> Result<()> {
        let n = self.num_vertices();
        (0..n).into_par_iter().try_for_each(|u| {
            let adj = self.neighbors(u);
            if adj.windows(2).any(|w| w[0] >= w[1]) {
                return Err(ScanError::UnsortedAdjacency(u));
            }
            for &v in adj {
                if v >= n {
                    return Err(ScanError::EdgeOutOfRange { u, v, n });
                }
                if v == u {
                    return Err(ScanError::SelfLoop(u));
                }
                if self.find_neighbor(v, u).is_none() {
                    return Err(ScanError::AsymmetricEdge { u, v });
                }
            }
            Ok(())
        })
    }
}
