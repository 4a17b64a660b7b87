use thiserror::Error;

/// Errors from building identifiers or regions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HtmError {
    #[error("invalid cell name {0:?}")]
    InvalidName(String),

    #[error("invalid cell id {0}")]
    InvalidId(u64),

    #[error("convex needs at least 3 vertices, got {0}")]
    InsufficientVertices(usize),

    #[error("vertices {0} and its successor are parallel")]
    DegenerateEdge(usize),
}
