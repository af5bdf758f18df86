//! SCAN cluster engine: core detection, core union, border attachment.
//!
//! Cores are read off the core-order index, unioned through their ε-edges
//! with the lock-free disjoint-set forest, and labeled by their set root.
//! Non-core vertices attach to the first ε-adjacent core their prefix scan
//! finds, or stay unclustered. Which qualifying core wins a border vertex is
//! deliberately unspecified; the core *set* is deterministic for a given
//! index.

use rayon::prelude::*;
use rustc_hash::FxHashSet;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::core_order::CoreOrder;
use crate::error::{Result, ScanError};
use crate::neighbor_order::NeighborOrder;
use crate::union_find::ConcurrentUnionFind;

/// Label for vertices that belong to no cluster.
pub const UNCLUSTERED: u32 = u32::MAX;

/// Dense vertex → cluster-id mapping returned by one clustering call.
///
/// Cluster ids lie in [0, |V|) since each cluster is named by one of its
/// core vertices, but they are not contiguous.
#[derive(Debug, Clone, PartialEq)]
pub struct Clustering {
    labels: Vec<u32>,
}

impl Clustering {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Cluster of `v`, or `None` when it is unclustered.
    pub fn cluster_of(&self, v: u32) -> Option<u32> {
        match self.labels[v as usize] {
            UNCLUSTERED => None,
            id => Some(id),
        }
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.labels
    }

    pub fn num_clusters(&self) -> usize {
        self.labels
            .iter()
            .filter(|&&l| l != UNCLUSTERED)
            .collect::<FxHashSet<_>>()
            .len()
    }

    pub fn clustered_count(&self) -> usize {
        self.labels.iter().filter(|&&l| l != UNCLUSTERED).count()
    }

    pub fn unclustered_count(&self) -> usize {
        self.labels.len() - self.clustered_count()
    }
}

pub(crate) fn cluster(
    order: &NeighborOrder,
    cores: &CoreOrder,
    mu: u32,
    epsilon: f32,
) -> Result<Clustering> {
    if mu < 2 {
        return Err(ScanError::InvalidMu(mu));
    }
    if !(0.0..=1.0).contains(&epsilon) {
        return Err(ScanError::InvalidEpsilon(epsilon));
    }
    let n = order.num_vertices();

    let core_list = cores.cores(mu, epsilon);
    let core_flags: Vec<AtomicBool> = (0..n).map(|_| AtomicBool::new(false)).collect();
    core_list
        .par_iter()
        .for_each(|c| core_flags[c.vertex as usize].store(true, Ordering::Relaxed));
    let is_core: Vec<bool> = core_flags.into_iter().map(AtomicBool::into_inner).collect();

    // union every core with its ε-adjacent cores; the prefix scan never
    // touches an edge below ε
    let forest = ConcurrentUnionFind::new(n as usize);
    core_list.par_iter().for_each(|c| {
        for e in order.eps_prefix(c.vertex, epsilon) {
            if is_core[e.neighbor as usize] {
                forest.union(c.vertex, e.neighbor);
            }
        }
    });

    let labels: Vec<u32> = (0..n)
        .into_par_iter()
        .map(|v| {
            if is_core[v as usize] {
                forest.find(v)
            } else {
                order
                    .eps_prefix(v, epsilon)
                    .iter()
                    .find(|e| is_core[e.neighbor as usize])
                    .map(|e| forest.find(e.neighbor))
                    .unwrap_or(UNCLUSTERED)
            }
        })
        .collect();

    Ok(Clustering { labels })
}
