//! Typed errors for graph validation, index construction, and queries.

use thiserror::Error;

/// Main error type for graph-scan operations.
///
/// Every operation either returns a fully valid output or one of these; no
/// partial state is retained on failure.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScanError {
    /// Adjacency list violates the sorted-ascending precondition.
    #[error("adjacency list of vertex {0} is not sorted by ascending neighbor id")]
    UnsortedAdjacency(u32),

    /// An edge references a vertex outside the graph.
    #[error("edge ({u}, {v}) references a vertex outside [0, {n})")]
    EdgeOutOfRange { u: u32, v: u32, n: u32 },

    /// A directed half-edge has no mirror, so the graph is not undirected.
    #[error("half-edge ({u}, {v}) has no mirror ({v}, {u}); the graph must be undirected")]
    AsymmetricEdge { u: u32, v: u32 },

    /// Self-loops are excluded by the simple-graph precondition.
    #[error("adjacency list of vertex {0} contains a self-loop")]
    SelfLoop(u32),

    /// CSR offsets are not a monotone cover of the neighbor array.
    #[error("CSR offsets are malformed")]
    MalformedOffsets,

    /// SCAN requires at least the vertex itself plus one neighbor.
    #[error("mu must be at least 2, got {0}")]
    InvalidMu(u32),

    /// The similarity threshold is a fraction of closed-neighborhood overlap.
    #[error("epsilon must lie in [0, 1], got {0}")]
    InvalidEpsilon(f32),

    /// Sketched variants need at least one sample per fingerprint.
    #[error("num_samples must be positive")]
    ZeroSamples,
}

/// Convenience result type for graph-scan operations.
pub type Result<T> = std::result::Result<T, ScanError>;
