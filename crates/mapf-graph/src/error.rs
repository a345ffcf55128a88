//! Graph-loading error type.

use thiserror::Error;

/// Errors produced by `mapf-graph`.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("malformed map (line {line}): {reason}")]
    MalformedMap { line: usize, reason: String },

    #[error("map header is missing `{0}`")]
    MissingHeader(&'static str),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type GraphResult<T> = Result<T, GraphError>;
