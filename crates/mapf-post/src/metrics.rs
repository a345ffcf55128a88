//! Solution quality metrics and lower bounds.
//!
//! An agent's *cost* is the timestep at which it reaches its final vertex and
//! never leaves again.  Its *loss* counts the moves and waits made while not
//! resting on that final vertex.

use mapf_core::{AgentId, VertexId};
use mapf_dist::DistTable;
use mapf_graph::Solution;
use mapf_instance::Instance;

// ── Over configurations ───────────────────────────────────────────────────────

/// Number of timesteps (`len − 1`); zero for an empty solution.
pub fn makespan(solution: &Solution) -> usize {
    solution.len().saturating_sub(1)
}

/// Cost of `agent` in `solution`.
pub fn path_cost(solution: &Solution, agent: AgentId) -> usize {
    let Some(last) = solution.last() else { return 0 };
    let goal = last.position(agent);
    solution
        .iter()
        .rposition(|q| q.position(agent) != goal)
        .map_or(0, |t| t + 1)
}

/// Σ of [`path_cost`] over all agents.
pub fn sum_of_costs(solution: &Solution) -> usize {
    let Some(first) = solution.first() else { return 0 };
    AgentId::range(first.len()).map(|i| path_cost(solution, i)).sum()
}

/// Σ over all agents of the steps taken while not resting on the final
/// vertex.
pub fn sum_of_loss(solution: &Solution) -> usize {
    let Some(first) = solution.first() else { return 0 };
    let agents: Vec<AgentId> = AgentId::range(first.len()).collect();
    sum_of_loss_of(solution, &agents)
}

/// [`sum_of_loss`] restricted to `agents`.
pub fn sum_of_loss_of(solution: &Solution, agents: &[AgentId]) -> usize {
    let Some(last) = solution.last() else { return 0 };
    agents
        .iter()
        .map(|&i| {
            let goal = last.position(i);
            solution
                .windows(2)
                .filter(|w| w[0].position(i) != goal || w[1].position(i) != goal)
                .count()
        })
        .sum()
}

// ── Over single-agent paths ───────────────────────────────────────────────────

/// Longest path length in moves.
pub fn makespan_paths(paths: &[Vec<VertexId>]) -> usize {
    paths.iter().map(|p| p.len().saturating_sub(1)).max().unwrap_or(0)
}

/// Timestep at which `path` reaches its last vertex for good.
pub fn path_cost_of(path: &[VertexId]) -> usize {
    let Some(&goal) = path.last() else { return 0 };
    path.iter().rposition(|&v| v != goal).map_or(0, |t| t + 1)
}

pub fn sum_of_costs_paths(paths: &[Vec<VertexId>]) -> usize {
    paths.iter().map(|p| path_cost_of(p)).sum()
}

/// Steps of `path` not spent resting on its last vertex.
pub fn path_loss(path: &[VertexId]) -> usize {
    let Some(&goal) = path.last() else { return 0 };
    path.windows(2).filter(|w| w[0] != goal || w[1] != goal).count()
}

pub fn sum_of_loss_paths(paths: &[Vec<VertexId>]) -> usize {
    paths.iter().map(|p| path_loss(p)).sum()
}

// ── Lower bounds ──────────────────────────────────────────────────────────────

/// Shortest-hop length of `agent`'s whole tour: start to first goal, then
/// goal to goal.
fn tour_length(instance: &Instance, dist: &DistTable, agent: AgentId) -> usize {
    let seq = &instance.goal_sequences[agent.index()];
    let start = instance.starts.position(agent);
    let first = dist.get(agent, 0, start) as usize;
    let rest: usize = (1..seq.len())
        .map(|j| dist.get(agent, j, seq[j - 1]) as usize)
        .sum();
    first + rest
}

/// No solution can finish before the longest single-agent tour.
pub fn makespan_lower_bound(instance: &Instance, dist: &DistTable) -> usize {
    AgentId::range(instance.agent_count())
        .map(|i| tour_length(instance, dist, i))
        .max()
        .unwrap_or(0)
}

pub fn sum_of_costs_lower_bound(instance: &Instance, dist: &DistTable) -> usize {
    AgentId::range(instance.agent_count())
        .map(|i| tour_length(instance, dist, i))
        .sum()
}
