//! Public facade: build the index once, cluster repeatedly.

use std::time::Instant;

use crate::cluster::{self, Clustering};
use crate::core_order::CoreOrder;
use crate::error::Result;
use crate::graph::CsrGraph;
use crate::neighbor_order::NeighborOrder;
use crate::similarity::{all_edge_similarities, SimilarityMeasure};

/// Reusable SCAN index over one immutable graph.
///
/// Construction pays for the similarity kernel and both orderings; every
/// subsequent [`ScanIndex::cluster`] call only scans ε-prefixes. The index
/// holds no mutable state, so clustering queries may run concurrently.
pub struct ScanIndex {
    neighbor_order: NeighborOrder,
    core_order: CoreOrder,
}

impl ScanIndex {
    /// Compute per-edge similarities under `measure` and derive the
    /// neighbor-order and core-order indices. The similarity sequence itself
    /// is dropped once the orderings are built.
    pub fn build(graph: &CsrGraph, measure: SimilarityMeasure) -> Result<ScanIndex> {
        let start = Instant::now();
        let similarities = all_edge_similarities(graph, measure)?;
        tracing::info!(
            half_edges = similarities.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "similarity kernel finished"
        );

        let start = Instant::now();
        let neighbor_order = NeighborOrder::build(graph, &similarities);
        drop(similarities);
        let core_order = CoreOrder::build(&neighbor_order);
        tracing::info!(
            max_mu = core_order.max_mu(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "neighbor-order and core-order built"
        );

        Ok(ScanIndex {
            neighbor_order,
            core_order,
        })
    }

    /// SCAN clustering at (μ, ε).
    ///
    /// μ counts the vertex itself, so it must be at least 2; ε must lie in
    /// [0, 1]. Border assignment between several qualifying cores is
    /// unspecified, everything else is deterministic for a fixed index.
    pub fn cluster(&self, mu: u32, epsilon: f32) -> Result<Clustering> {
        cluster::cluster(&self.neighbor_order, &self.core_order, mu, epsilon)
    }

    pub fn num_vertices(&self) -> u32 {
        self.neighbor_order.num_vertices()
    }

    pub fn neighbor_order(&self) -> &NeighborOrder {
        &self.neighbor_order
    }

    pub fn core_order(&self) -> &CoreOrder {
        &self.core_order
    }
}
