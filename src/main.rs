use anyhow::{Context, Result};
use clap::Parser;
use rustc_hash::FxHashMap;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::time::Instant;

use graph_scan::cli::Cli;
use graph_scan::cluster::UNCLUSTERED;
use graph_scan::io::read_edge_list;
use graph_scan::ScanIndex;

#[derive(Serialize)]
struct RunSummary {
    vertices: u32,
    edges: u64,
    mu: u32,
    epsilon: f32,
    clusters: usize,
    clustered: usize,
    unclustered: usize,
    largest_cluster: usize,
    build_secs: f64,
    cluster_secs: f64,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    println!("Reading edge list: {}", cli.input.display());
    let start = Instant::now();
    let edge_list = read_edge_list(&cli.input)?;
    println!(
        "Loaded {} vertices, {} edges in {:.2}s",
        edge_list.graph.num_vertices(),
        edge_list.graph.num_edges(),
        start.elapsed().as_secs_f64()
    );

    println!("\nBuilding index ({:?})...", cli.measure());
    let build_start = Instant::now();
    let index = ScanIndex::build(&edge_list.graph, cli.measure())?;
    let build_secs = build_start.elapsed().as_secs_f64();
    println!("Index built in {build_secs:.2}s");

    println!("\nClustering at mu={}, epsilon={}...", cli.mu, cli.epsilon);
    let cluster_start = Instant::now();
    let clustering = index.cluster(cli.mu, cli.epsilon)?;
    let cluster_secs = cluster_start.elapsed().as_secs_f64();

    let mut sizes: FxHashMap<u32, usize> = FxHashMap::default();
    for &label in clustering.as_slice() {
        if label != UNCLUSTERED {
            *sizes.entry(label).or_insert(0) += 1;
        }
    }
    let summary = RunSummary {
        vertices: edge_list.graph.num_vertices(),
        edges: edge_list.graph.num_edges(),
        mu: cli.mu,
        epsilon: cli.epsilon,
        clusters: sizes.len(),
        clustered: clustering.clustered_count(),
        unclustered: clustering.unclustered_count(),
        largest_cluster: sizes.values().copied().max().unwrap_or(0),
        build_secs,
        cluster_secs,
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("Clustered in {cluster_secs:.3}s");
        println!("  Clusters:    {}", summary.clusters);
        println!(
            "  Clustered:   {} / {}",
            summary.clustered, summary.vertices
        );
        println!("  Unclustered: {}", summary.unclustered);
        println!("  Largest:     {}", summary.largest_cluster);
    }

    if let Some(path) = &cli.output {
        let file = File::create(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        for (v, &label) in clustering.as_slice().iter().enumerate() {
            if label == UNCLUSTERED {
                writeln!(writer, "{}\t-1", edge_list.vertex_labels[v])?;
            } else {
                writeln!(writer, "{}\t{}", edge_list.vertex_labels[v], label)?;
            }
        }
        writer.flush()?;
        println!("\nAssignments written to {}", path.display());
    }

    Ok(())
}
