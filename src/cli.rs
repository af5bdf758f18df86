//! CLI definition for the graph-scan driver.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::similarity::SimilarityMeasure;

#[derive(Parser)]
#[command(name = "graph-scan")]
#[command(about = "Index-based structural graph clustering (SCAN)", long_about = None)]
pub struct Cli {
    /// Input edge list: whitespace-separated vertex pairs, '#' comments
    pub input: PathBuf,

    /// Minimum closed-neighborhood size μ (counts the vertex itself)
    #[arg(long, default_value = "2")]
    pub mu: u32,

    /// Similarity threshold ε in [0, 1]
    #[arg(long)]
    pub epsilon: f32,

    /// Similarity variant
    #[arg(long, value_enum, default_value = "cosine")]
    pub similarity: SimilarityArg,

    /// Samples per fingerprint for the approximate variants
    #[arg(long, default_value = "256")]
    pub num_samples: u32,

    /// Seed for the approximate variants
    #[arg(long, default_value = "42")]
    pub seed: u64,

    /// Write per-vertex cluster assignments to this file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Print the run summary as JSON instead of text
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, ValueEnum)]
pub enum SimilarityArg {
    Cosine,
    Jaccard,
    ApproxCosine,
    ApproxJaccard,
}

impl Cli {
    pub fn measure(&self) -> SimilarityMeasure {
        match self.similarity {
            SimilarityArg::Cosine => SimilarityMeasure::Cosine,
            SimilarityArg::Jaccard => SimilarityMeasure::Jaccard,
            SimilarityArg::ApproxCosine => SimilarityMeasure::ApproxCosine {
                num_samples: self.num_samples,
                seed: self.seed,
            },
            SimilarityArg::ApproxJaccard => SimilarityMeasure::ApproxJaccard {
                num_samples: self.num_samples,
                seed: self.seed,
            },
        }
    }
}
