//! Error types for mapf-post.

use thiserror::Error;

use mapf_core::AgentId;

/// Why a solution is not a valid plan for an instance.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FeasibilityError {
    #[error("solution is empty")]
    EmptySolution,

    #[error("timestep {t} has {got} agents, expected {expected}")]
    AgentCountMismatch { t: usize, expected: usize, got: usize },

    #[error("{agent} does not start at its start vertex")]
    StartMismatch { agent: AgentId },

    #[error("{agent} jumps between non-adjacent vertices at timestep {t}")]
    InvalidTransition { agent: AgentId, t: usize },

    #[error("{a} and {b} share a vertex at timestep {t}")]
    VertexConflict { a: AgentId, b: AgentId, t: usize },

    #[error("{agent} follows {leader} at timestep {t}")]
    FollowingConflict { agent: AgentId, leader: AgentId, t: usize },

    #[error("{a} and {b} swap vertices at timestep {t}")]
    SwapConflict { a: AgentId, b: AgentId, t: usize },

    #[error("only {reached} goals reached, {required} required")]
    NotEnoughGoals { reached: usize, required: usize },
}

/// Errors that can occur when writing results.
#[derive(Debug, Error)]
pub enum PostError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),
}

/// Alias for `Result<T, PostError>`.
pub type PostResult<T> = Result<T, PostError>;
