//! Error types for the 3-coloring protocol.

use crate::protocol::messages::ProverId;

/// Errors raised by graph generation, the protocol parties and the tooling around them.
///
/// A rejected opening is not an error: [`crate::Verifier::verify`] reports it as `Ok(false)`.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A graph must contain at least one node.
    #[error("invalid graph size {0}: a graph needs at least one node")]
    InvalidGraphSize(usize),

    /// Edge density must lie in `(0, 1]`.
    #[error("invalid edge density {0}: expected a value in (0, 1]")]
    InvalidEdgeDensity(f64),

    /// A challenge was requested on a graph without edges.
    #[error("graph has no edges to challenge")]
    EmptyEdgeSet,

    /// A response or verification was requested without a pending commitment.
    #[error("no pending commitment for prover {0}")]
    StaleCommitment(ProverId),

    /// A node index fell outside `[0, size)`.
    #[error("node index {index} out of range for graph of size {size}")]
    IndexOutOfRange { index: usize, size: usize },

    /// A published digest vector does not cover every node exactly once.
    #[error("commitment holds {actual} digests, graph has {expected} nodes")]
    CommitmentSizeMismatch { expected: usize, actual: usize },

    /// A hand-built graph is structurally invalid.
    #[error("malformed graph: {0}")]
    MalformedGraph(String),

    /// A hand-built graph connects two nodes of the same color.
    #[error("edge ({0}, {1}) joins two nodes of the same color")]
    ColoringConflict(usize, usize),

    /// The same prover identity was scheduled twice in one parallel run.
    #[error("prover {0} appears more than once")]
    DuplicateProver(ProverId),

    /// A replayed transcript round disagrees with its recorded verdict.
    #[error("transcript round {0} does not reproduce its recorded verdict")]
    TranscriptMismatch(usize),

    /// Invalid configuration value or unreadable configuration file.
    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Binary encoding or decoding failed.
    #[error("codec error: {0}")]
    Codec(#[from] bincode::Error),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
