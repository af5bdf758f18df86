//! End-to-end scenarios: fixture clusterings, sketch accuracy on random
//! graphs, and the universal SCAN invariants.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rustc_hash::{FxHashMap, FxHashSet};

use graph_scan::{
    all_edge_similarities, Clustering, CsrGraph, ScanIndex, SimilarityMeasure, UNCLUSTERED,
};

/// Two triangles {0,1,2} and {3,4,5} bridged by the edge (2,3).
fn two_triangles() -> CsrGraph {
    CsrGraph::from_edges(6, &[(0, 1), (0, 2), (1, 2), (2, 3), (3, 4), (3, 5), (4, 5)]).unwrap()
}

fn erdos_renyi(n: u32, p: f64, seed: u64) -> CsrGraph {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut edges = Vec::new();
    for u in 0..n {
        for v in u + 1..n {
            if rng.gen_bool(p) {
                edges.push((u, v));
            }
        }
    }
    CsrGraph::from_edges(n, &edges).unwrap()
}

fn similarity_of(
    graph: &CsrGraph,
    sims: &[graph_scan::EdgeSimilarity],
    u: u32,
    v: u32,
) -> f32 {
    sims[graph.edge_offset(u) + graph.find_neighbor(u, v).unwrap()].similarity
}

/// Partition-level equality: same blocks, regardless of which core names
/// each cluster.
fn canonical(clustering: &Clustering) -> Vec<u32> {
    let mut first_seen: FxHashMap<u32, u32> = FxHashMap::default();
    clustering
        .as_slice()
        .iter()
        .enumerate()
        .map(|(v, &label)| {
            if label == UNCLUSTERED {
                UNCLUSTERED
            } else {
                *first_seen.entry(label).or_insert(v as u32)
            }
        })
        .collect()
}

#[test]
fn cosine_and_jaccard_sanity_on_the_fixture() {
    let graph = two_triangles();
    let cosine = all_edge_similarities(&graph, SimilarityMeasure::Cosine).unwrap();
    assert!((similarity_of(&graph, &cosine, 0, 1) - 1.0).abs() < 1e-6);
    let jaccard = all_edge_similarities(&graph, SimilarityMeasure::Jaccard).unwrap();
    assert!((similarity_of(&graph, &jaccard, 0, 1) - 1.0).abs() < 1e-6);
}

#[test]
fn splitting_the_two_triangles() {
    let graph = two_triangles();
    let index = ScanIndex::build(&graph, SimilarityMeasure::Cosine).unwrap();
    // the intra-triangle similarities are 1.0 and ~0.866, the bridge is 0.5:
    // a threshold between them separates the triangles
    let clustering = index.cluster(3, 0.8).unwrap();
    let left = clustering.cluster_of(0).unwrap();
    let right = clustering.cluster_of(3).unwrap();
    assert_ne!(left, right);
    assert_eq!(clustering.cluster_of(1), Some(left));
    assert_eq!(clustering.cluster_of(2), Some(left));
    assert_eq!(clustering.cluster_of(4), Some(right));
    assert_eq!(clustering.cluster_of(5), Some(right));
    // vertex 3 is a core of exactly one of the two clusters
    assert!(index
        .core_order()
        .cores(3, 0.8)
        .iter()
        .any(|c| c.vertex == 3));
}

#[test]
fn near_zero_epsilon_merges_everything() {
    let graph = two_triangles();
    let index = ScanIndex::build(&graph, SimilarityMeasure::Cosine).unwrap();
    let clustering = index.cluster(2, 0.01).unwrap();
    assert_eq!(clustering.num_clusters(), 1);
    assert_eq!(clustering.unclustered_count(), 0);
}

#[test]
fn mu_beyond_max_degree_clusters_nothing() {
    let graph = two_triangles();
    let index = ScanIndex::build(&graph, SimilarityMeasure::Cosine).unwrap();
    let clustering = index.cluster(6, 0.0).unwrap();
    assert_eq!(clustering.num_clusters(), 0);
    assert!((0..6).all(|v| clustering.cluster_of(v).is_none()));
}

#[test]
fn clustering_is_idempotent_up_to_cluster_naming() {
    let graph = two_triangles();
    let index = ScanIndex::build(&graph, SimilarityMeasure::Cosine).unwrap();
    let a = index.cluster(3, 0.8).unwrap();
    let b = index.cluster(3, 0.8).unwrap();
    assert_eq!(canonical(&a), canonical(&b));
}

#[test]
fn exact_similarities_are_symmetric_on_a_random_graph() {
    let graph = erdos_renyi(150, 0.1, 33);
    for measure in [SimilarityMeasure::Cosine, SimilarityMeasure::Jaccard] {
        let sims = all_edge_similarities(&graph, measure).unwrap();
        for e in &sims {
            let mirror = similarity_of(&graph, &sims, e.neighbor, e.source);
            assert_eq!(e.similarity.to_bits(), mirror.to_bits());
            assert!((0.0..=1.0).contains(&e.similarity));
        }
    }
}

#[test]
fn exact_mode_is_deterministic() {
    let graph = erdos_renyi(150, 0.1, 34);
    let a = all_edge_similarities(&graph, SimilarityMeasure::Cosine).unwrap();
    let b = all_edge_similarities(&graph, SimilarityMeasure::Cosine).unwrap();
    assert_eq!(a, b);
}

#[test]
fn formulas_match_a_brute_force_count() {
    let graph = erdos_renyi(80, 0.2, 35);
    let neighbor_sets: Vec<FxHashSet<u32>> = (0..graph.num_vertices())
        .map(|v| graph.neighbors(v).iter().copied().collect())
        .collect();
    let sims = all_edge_similarities(&graph, SimilarityMeasure::Jaccard).unwrap();
    for e in &sims {
        let shared = neighbor_sets[e.source as usize]
            .intersection(&neighbor_sets[e.neighbor as usize])
            .count() as f64;
        let du = graph.degree(e.source) as f64;
        let dv = graph.degree(e.neighbor) as f64;
        let expected = (shared + 2.0) / (du + dv - shared);
        assert!((e.similarity as f64 - expected).abs() < 1e-6);
    }
}

#[test]
fn raising_either_parameter_shrinks_the_core_set() {
    let graph = erdos_renyi(120, 0.15, 36);
    let index = ScanIndex::build(&graph, SimilarityMeasure::Jaccard).unwrap();
    let cores = |mu: u32, eps: f32| -> FxHashSet<u32> {
        index
            .core_order()
            .cores(mu, eps)
            .iter()
            .map(|c| c.vertex)
            .collect()
    };
    for (mu, lo, hi) in [(2, 0.2, 0.3), (3, 0.15, 0.4), (4, 0.1, 0.25)] {
        assert!(cores(mu, hi).is_subset(&cores(mu, lo)));
        assert!(cores(mu + 1, lo).is_subset(&cores(mu, lo)));
    }
}

#[test]
fn raising_epsilon_only_refines_core_clusters() {
    let graph = erdos_renyi(120, 0.15, 37);
    let index = ScanIndex::build(&graph, SimilarityMeasure::Jaccard).unwrap();
    let (mu, lo, hi) = (3, 0.25, 0.35);
    let coarse = index.cluster(mu, lo).unwrap();
    let fine = index.cluster(mu, hi).unwrap();
    let fine_cores: FxHashSet<u32> = index
        .core_order()
        .cores(mu, hi)
        .iter()
        .map(|c| c.vertex)
        .collect();
    // cores that share a cluster under the stricter threshold still share
    // one under the looser threshold
    for &u in &fine_cores {
        for &v in &fine_cores {
            if fine.cluster_of(u) == fine.cluster_of(v) {
                assert_eq!(coarse.cluster_of(u), coarse.cluster_of(v));
            }
        }
    }
}

#[test]
fn core_and_border_contracts_hold() {
    let graph = erdos_renyi(120, 0.15, 38);
    let index = ScanIndex::build(&graph, SimilarityMeasure::Jaccard).unwrap();
    let (mu, eps) = (3, 0.3);
    let clustering = index.cluster(mu, eps).unwrap();
    let core_set: FxHashSet<u32> = index
        .core_order()
        .cores(mu, eps)
        .iter()
        .map(|c| c.vertex)
        .collect();
    for v in 0..graph.num_vertices() {
        if core_set.contains(&v) {
            assert!(index.neighbor_order().count_at_least(v, eps) >= (mu - 1) as usize);
            assert!(clustering.cluster_of(v).is_some());
        } else if let Some(label) = clustering.cluster_of(v) {
            let attached = index
                .neighbor_order()
                .eps_prefix(v, eps)
                .iter()
                .any(|e| {
                    core_set.contains(&e.neighbor)
                        && clustering.cluster_of(e.neighbor) == Some(label)
                });
            assert!(attached, "border vertex {v} has no matching ε-core");
        }
    }
}

#[test]
fn approx_jaccard_tracks_exact_on_a_dense_random_graph() {
    let graph = erdos_renyi(400, 0.5, 42);
    let num_samples = 48;
    let threshold = 4 * num_samples;
    let exact = all_edge_similarities(&graph, SimilarityMeasure::Jaccard).unwrap();
    let approx = all_edge_similarities(
        &graph,
        SimilarityMeasure::ApproxJaccard {
            num_samples,
            seed: 1,
        },
    )
    .unwrap();

    let mut sketched_edges = 0usize;
    let mut within_tolerance = 0usize;
    let mut total_error = 0.0f64;
    for (e, a) in exact.iter().zip(&approx) {
        let both_high = graph.degree(e.source) >= threshold
            && graph.degree(e.neighbor) >= threshold;
        if both_high {
            let err = (e.similarity as f64 - a.similarity as f64).abs();
            sketched_edges += 1;
            total_error += err;
            if err <= 0.2 {
                within_tolerance += 1;
            }
            assert!((0.0..=1.0).contains(&a.similarity));
        } else {
            // edges with a low-degree endpoint stay on the exact path
            assert_eq!(e.similarity.to_bits(), a.similarity.to_bits());
        }
    }
    assert!(sketched_edges > 1_000, "fixture lost its high-degree edges");
    let fraction = within_tolerance as f64 / sketched_edges as f64;
    assert!(fraction >= 0.95, "only {fraction:.3} within tolerance");
    assert!(total_error / sketched_edges as f64 <= 0.08);
}

#[test]
fn approx_cosine_is_exact_for_identical_closed_neighborhoods() {
    // two hubs adjacent to each other and to every leaf: N[0] = N[1] = V,
    // so the sketched estimate must equal the exact 1.0
    let mut edges = vec![(0u32, 1u32)];
    for leaf in 2..302u32 {
        edges.push((0, leaf));
        edges.push((1, leaf));
    }
    let graph = CsrGraph::from_edges(302, &edges).unwrap();
    let measure = SimilarityMeasure::ApproxCosine {
        num_samples: 70, // not a multiple of 64: exercises the partial word
        seed: 5,
    };
    let approx = all_edge_similarities(&graph, measure).unwrap();
    assert!((similarity_of(&graph, &approx, 0, 1) - 1.0).abs() < 1e-6);

    // every other edge touches a low-degree leaf and stays exact
    let exact = all_edge_similarities(&graph, SimilarityMeasure::Cosine).unwrap();
    for (e, a) in exact.iter().zip(&approx) {
        if (e.source, e.neighbor) != (0, 1) && (e.source, e.neighbor) != (1, 0) {
            assert_eq!(e.similarity.to_bits(), a.similarity.to_bits());
        }
    }

    // fixed seed, reproducible estimates
    let again = all_edge_similarities(&graph, measure).unwrap();
    assert_eq!(approx, again);
}

#[test]
fn approx_clustering_matches_exact_when_sketches_are_tight() {
    let graph = two_triangles();
    // no vertex reaches the degree threshold, so the sketched index is the
    // exact index and the clusterings agree exactly
    let exact = ScanIndex::build(&graph, SimilarityMeasure::Cosine).unwrap();
    let approx = ScanIndex::build(
        &graph,
        SimilarityMeasure::ApproxCosine {
            num_samples: 16,
            seed: 2,
        },
    )
    .unwrap();
    let a = exact.cluster(3, 0.8).unwrap();
    let b = approx.cluster(3, 0.8).unwrap();
    assert_eq!(canonical(&a), canonical(&b));
}
