//! Edge-list ingest for the driver binary.
//!
//! Accepts whitespace-separated vertex pairs, one edge per line, with `#`
//! comment lines. Vertex labels are arbitrary u64 values and are remapped to
//! the dense range the engine works on; the original labels are kept for
//! output.

use anyhow::{bail, Context, Result};
use rustc_hash::FxHashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::graph::CsrGraph;

#[derive(Debug)]
pub struct EdgeList {
    pub graph: CsrGraph,
    /// Dense id → original label, in first-seen order.
    pub vertex_labels: Vec<u64>,
}

pub fn read_edge_list(path: &Path) -> Result<EdgeList> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open edge list {}", path.display()))?;
    let reader = BufReader::new(file);

    let mut ids: FxHashMap<u64, u32> = FxHashMap::default();
    let mut vertex_labels = Vec::new();
    let mut edges = Vec::new();

    fn intern(label: u64, labels: &mut Vec<u64>, ids: &mut FxHashMap<u64, u32>) -> u32 {
        *ids.entry(label).or_insert_with(|| {
            labels.push(label);
            (labels.len() - 1) as u32
        })
    }

    for (lineno, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("Failed to read {}", path.display()))?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let mut fields = line.split_whitespace();
        let (u, v) = match (fields.next(), fields.next(), fields.next()) {
            (Some(u), Some(v), None) => (u, v),
            _ => bail!(
                "{}:{}: expected two whitespace-separated vertex ids",
                path.display(),
                lineno + 1
            ),
        };
        let u: u64 = u.parse().with_context(|| {
            format!("{}:{}: invalid vertex id '{u}'", path.display(), lineno + 1)
        })?;
        let v: u64 = v.parse().with_context(|| {
            format!("{}:{}: invalid vertex id '{v}'", path.display(), lineno + 1)
        })?;
        let u = intern(u, &mut vertex_labels, &mut ids);
        let v = intern(v, &mut vertex_labels, &mut ids);
        edges.push((u, v));
    }

    let graph = CsrGraph::from_edges(vertex_labels.len() as u32, &edges)?;
    Ok(EdgeList {
        graph,
        vertex_labels,
    })
}
