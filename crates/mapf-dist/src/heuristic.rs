//! Configuration-level heuristic.

use mapf_core::AgentId;
use mapf_graph::Config;

use crate::DistTable;

/// Sum over agents of the distance to each agent's current goal.
pub struct Heuristic<'a> {
    dist: &'a DistTable,
}

impl<'a> Heuristic<'a> {
    pub fn new(dist: &'a DistTable) -> Self {
        Self { dist }
    }

    /// `Σ_i dist(i, goal_indices[i], positions[i])`.
    pub fn get(&self, config: &Config) -> u32 {
        AgentId::range(config.len())
            .map(|i| self.dist.get(i, config.goal_index(i), config.position(i)))
            .sum()
    }
}
