use mapf_core::{AgentId, VertexId};
use mapf_graph::GraphError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InstanceError {
    #[error("{what} length {got} does not match agent count {expected}")]
    AgentCountMismatch {
        expected: usize,
        got:      usize,
        what:     &'static str,
    },

    #[error("agent {0} has an empty goal sequence")]
    EmptyGoalSequence(AgentId),

    #[error("cell {0} is an obstacle or outside the map")]
    InvalidCell(u32),

    #[error("vertex {0} does not exist in the graph")]
    InvalidVertex(VertexId),

    #[error("agent {0} starts on an occupied vertex")]
    DuplicateStart(AgentId),

    #[error("cannot place {requested} agents on {available} vertices")]
    NotEnoughVertices { requested: usize, available: usize },

    #[error("scenario parse error: {0}")]
    Parse(String),

    #[error("CSV read error: {0}")]
    Csv(#[from] csv::Error),

    #[error("graph error: {0}")]
    Graph(#[from] GraphError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type InstanceResult<T> = Result<T, InstanceError>;
