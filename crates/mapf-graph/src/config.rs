//! Joint configurations.
//!
//! A [`Config`] assigns one vertex to every agent plus the index of the goal
//! each agent is currently heading to.  A [`Solution`] is the sequence of
//! configurations from the start, one per timestep.

use std::collections::HashMap;
use std::fmt;

use mapf_core::{AgentId, VertexId};

use crate::Graph;

/// One vertex and one goal index per agent.
///
/// Two configs are equal iff both sequences match elementwise.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Config {
    /// Vertex of each agent, indexed by `AgentId`.
    pub positions: Vec<VertexId>,
    /// Index into each agent's goal sequence.  Equal to the sequence length
    /// once every waypoint has been visited.
    pub goal_indices: Vec<usize>,
}

/// Ordered sequence of configurations, one per timestep.
pub type Solution = Vec<Config>;

impl Config {
    /// # Panics
    /// Panics if the two sequences differ in length.
    pub fn new(positions: Vec<VertexId>, goal_indices: Vec<usize>) -> Self {
        assert_eq!(positions.len(), goal_indices.len(), "config sequences differ in length");
        Self { positions, goal_indices }
    }

    /// Config with every goal index at 0.
    pub fn from_positions(positions: Vec<VertexId>) -> Self {
        let goal_indices = vec![0; positions.len()];
        Self { positions, goal_indices }
    }

    /// Number of agents.
    #[inline]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    #[inline]
    pub fn position(&self, agent: AgentId) -> VertexId {
        self.positions[agent.index()]
    }

    #[inline]
    pub fn goal_index(&self, agent: AgentId) -> usize {
        self.goal_indices[agent.index()]
    }

    /// `true` once the agents have together visited at least `threshold`
    /// waypoints.
    pub fn enough_goals_reached(&self, threshold: usize) -> bool {
        let mut count = 0;
        for &j in &self.goal_indices {
            count += j;
            if count >= threshold {
                return true;
            }
        }
        count >= threshold
    }

    /// Canonical text form `{ <cell-index> ... } { <goal-index> ... }`.
    pub fn display<'a>(&'a self, graph: &'a Graph) -> ConfigDisplay<'a> {
        ConfigDisplay { config: self, graph }
    }
}

/// [`Display`](fmt::Display) adapter returned by [`Config::display`].
pub struct ConfigDisplay<'a> {
    config: &'a Config,
    graph:  &'a Graph,
}

impl fmt::Display for ConfigDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{ ")?;
        for &v in &self.config.positions {
            write!(f, "{} ", self.graph.cell_index(v))?;
        }
        write!(f, "}} {{ ")?;
        for j in &self.config.goal_indices {
            write!(f, "{j} ")?;
        }
        write!(f, "}}")
    }
}

// ── Conflict predicates ───────────────────────────────────────────────────────

/// `true` if some agent moves into a vertex that a *different* agent
/// occupied in `from`.
pub fn has_following_conflict(from: &Config, to: &Config) -> bool {
    let occupied: HashMap<VertexId, usize> = from
        .positions
        .iter()
        .enumerate()
        .map(|(i, &v)| (v, i))
        .collect();
    to.positions
        .iter()
        .enumerate()
        .any(|(i, v)| occupied.get(v).is_some_and(|&j| j != i))
}

/// `true` if two agents trade vertices between `from` and `to`.
pub fn has_swap_conflict(from: &Config, to: &Config) -> bool {
    let occupied: HashMap<VertexId, usize> = from
        .positions
        .iter()
        .enumerate()
        .map(|(i, &v)| (v, i))
        .collect();
    to.positions.iter().enumerate().any(|(i, v)| match occupied.get(v) {
        Some(&j) if j != i => to.positions[j] == from.positions[i],
        _ => false,
    })
}
