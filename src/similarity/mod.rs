//! Per-edge structural similarity over closed neighborhoods.
//!
//! One score per directed half-edge, symmetric across the two directions of
//! every undirected edge. The exact variants reduce to a shared subroutine
//! over the triangle-counting kernel; the approximate variants sketch
//! high-degree vertices and keep the exact path for every edge with a
//! low-degree endpoint.

mod minhash;
mod simhash;
pub(crate) mod triangles;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ScanError};
use crate::graph::CsrGraph;
use minhash::MinHashSketch;
use simhash::SimHashSketch;

/// Similarity variant chosen at index construction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SimilarityMeasure {
    /// Exact cosine over closed neighborhoods, via triangle counting.
    Cosine,
    /// Exact Jaccard over closed neighborhoods, via triangle counting.
    Jaccard,
    /// SimHash fingerprints where both endpoints are high-degree, exact
    /// cosine elsewhere.
    ApproxCosine { num_samples: u32, seed: u64 },
    /// MinHash fingerprints where both endpoints are high-degree, exact
    /// Jaccard elsewhere.
    ApproxJaccard { num_samples: u32, seed: u64 },
}

/// Structural similarity of one directed half-edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeSimilarity {
    pub source: u32,
    pub neighbor: u32,
    pub similarity: f32,
}

/// Vertices with `deg >= APPROX_DEGREE_FACTOR * num_samples` are sketched;
/// below that, exact counting is cheaper than building and comparing
/// fingerprints.
const APPROX_DEGREE_FACTOR: u32 = 4;

/// One `EdgeSimilarity` per directed half-edge, in CSR slot order.
pub fn all_edge_similarities(
    graph: &CsrGraph,
    measure: SimilarityMeasure,
) -> Result<Vec<EdgeSimilarity>> {
    match measure {
        SimilarityMeasure::Cosine => {
            let shared = triangles::shared_neighbor_counts(graph, None);
            Ok(materialize(graph, |u, v, slot| {
                cosine(graph.degree(u), graph.degree(v), shared[slot])
            }))
        }
        SimilarityMeasure::Jaccard => {
            let shared = triangles::shared_neighbor_counts(graph, None);
            Ok(materialize(graph, |u, v, slot| {
                jaccard(graph.degree(u), graph.degree(v), shared[slot])
            }))
        }
        SimilarityMeasure::ApproxCosine { num_samples, seed } => {
            let high = high_degree_flags(graph, num_samples)?;
            let sketch = SimHashSketch::build(graph, &high, num_samples, seed);
            let shared = triangles::shared_neighbor_counts(graph, Some(&high));
            Ok(materialize(graph, |u, v, slot| {
                if high[u as usize] && high[v as usize] {
                    sketch.estimate(u, v)
                } else {
                    cosine(graph.degree(u), graph.degree(v), shared[slot])
                }
            }))
        }
        SimilarityMeasure::ApproxJaccard { num_samples, seed } => {
            let high = high_degree_flags(graph, num_samples)?;
            let sketch = MinHashSketch::build(graph, &high, num_samples, seed);
            let shared = triangles::shared_neighbor_counts(graph, Some(&high));
            Ok(materialize(graph, |u, v, slot| {
                if high[u as usize] && high[v as usize] {
                    sketch.estimate(u, v)
                } else {
                    jaccard(graph.degree(u), graph.degree(v), shared[slot])
                }
            }))
        }
    }
}

/// Cosine of the closed-neighborhood indicator vectors: the intersection is
/// `shared + 2` because each endpoint lies in the other's closed
/// neighborhood.
#[inline]
fn cosine(deg_u: u32, deg_v: u32, shared: u32) -> f32 {
    let num = shared as f64 + 2.0;
    (num / ((deg_u as f64 + 1.0) * (deg_v as f64 + 1.0)).sqrt()) as f32
}

/// Jaccard index of the closed neighborhoods.
#[inline]
fn jaccard(deg_u: u32, deg_v: u32, shared: u32) -> f32 {
    let num = shared as f64 + 2.0;
    (num / (deg_u as f64 + deg_v as f64 - shared as f64)) as f32
}

fn high_degree_flags(graph: &CsrGraph, num_samples: u32) -> Result<Vec<bool>> {
    if num_samples == 0 {
        return Err(ScanError::ZeroSamples);
    }
    let threshold = APPROX_DEGREE_FACTOR.saturating_mul(num_samples);
    let n = graph.num_vertices();
    Ok((0..n)
        .into_par_iter()
        .map(|v| graph.degree(v) >= threshold)
        .collect())
}

/// Materialize the per-half-edge scores in CSR slot order, in parallel over
/// source vertices.
fn materialize<F>(graph: &CsrGraph, score: F) -> Vec<EdgeSimilarity>
where
    F: Fn(u32, u32, usize) -> f32 + Sync,
{
    let n = graph.num_vertices();
    let score = &score;
    (0..n)
        .into_par_iter()
        .flat_map_iter(move |u| {
            let base = graph.edge_offset(u);
            graph
                .neighbors(u)
                .iter()
                .enumerate()
                .map(move |(k, &v)| EdgeSimilarity {
                    source: u,
                    neighbor: v,
                    similarity: score(u, v, base + k),
                })
        })
        .collect()
}
