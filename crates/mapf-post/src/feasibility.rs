//! Solution validation.

use tracing::debug;

use mapf_core::{AgentId, ConflictMode, VertexId};
use mapf_graph::Solution;
use mapf_instance::Instance;

use crate::FeasibilityError;

/// Check that `solution` is a valid plan for `instance`.
///
/// * the first configuration equals the starts;
/// * every agent stays or follows an edge between consecutive timesteps;
/// * no two agents share a vertex;
/// * under `FollowingDisallowed` no agent enters a vertex another agent
///   occupied at the previous timestep, under `FollowingAllowed` no two
///   agents trade vertices;
/// * at least `threshold` waypoints are visited (all of them for `None`).
///
/// Goal visits are recomputed from positions; the goal indices stored in the
/// configurations are not trusted.
pub fn check_solution(
    instance:  &Instance,
    solution:  &Solution,
    threshold: Option<usize>,
    mode:      ConflictMode,
) -> Result<(), FeasibilityError> {
    let n = instance.agent_count();
    let graph = instance.graph();

    let Some(first) = solution.first() else {
        return Err(FeasibilityError::EmptySolution);
    };
    for (t, q) in solution.iter().enumerate() {
        if q.len() != n {
            return Err(FeasibilityError::AgentCountMismatch { t, expected: n, got: q.len() });
        }
    }
    for i in AgentId::range(n) {
        if first.position(i) != instance.starts.position(i) {
            return Err(FeasibilityError::StartMismatch { agent: i });
        }
    }

    let mut owner = vec![AgentId::INVALID; graph.size()];
    let mut goal_indices: Vec<usize> = AgentId::range(n)
        .map(|i| instance.advance_goal_index(i, 0, first.position(i)))
        .collect();

    for t in 1..solution.len() {
        let (q_from, q_to) = (&solution[t - 1], &solution[t]);

        for i in AgentId::range(n) {
            let (a, b) = (q_from.position(i), q_to.position(i));
            if a != b && !graph.is_adjacent(a, b) {
                return Err(FeasibilityError::InvalidTransition { agent: i, t });
            }
        }

        // vertex conflicts
        let mut conflict = None;
        for i in AgentId::range(n) {
            let v = q_to.position(i);
            let j = owner[v.index()];
            if j.is_valid() {
                conflict = Some(FeasibilityError::VertexConflict { a: j, b: i, t });
                break;
            }
            owner[v.index()] = i;
        }
        reset(&mut owner, &q_to.positions);
        if let Some(err) = conflict {
            return Err(err);
        }

        // following / swap conflicts
        for i in AgentId::range(n) {
            owner[q_from.position(i).index()] = i;
        }
        let result = AgentId::range(n).try_for_each(|i| {
            let j = owner[q_to.position(i).index()];
            if !j.is_valid() || j == i {
                return Ok(());
            }
            match mode {
                ConflictMode::FollowingDisallowed => {
                    Err(FeasibilityError::FollowingConflict { agent: i, leader: j, t })
                }
                ConflictMode::FollowingAllowed if q_to.position(j) == q_from.position(i) => {
                    Err(FeasibilityError::SwapConflict { a: i, b: j, t })
                }
                ConflictMode::FollowingAllowed => Ok(()),
            }
        });
        reset(&mut owner, &q_from.positions);
        result?;

        for i in AgentId::range(n) {
            let j = &mut goal_indices[i.index()];
            *j = instance.advance_goal_index(i, *j, q_to.position(i));
        }
    }

    let reached: usize = goal_indices.iter().sum();
    let required = threshold.unwrap_or_else(|| instance.total_goals());
    if reached < required {
        return Err(FeasibilityError::NotEnoughGoals { reached, required });
    }
    Ok(())
}

/// `true` if [`check_solution`] accepts `solution`.  The reason for a
/// rejection is logged at debug level.
pub fn is_feasible_solution(
    instance:  &Instance,
    solution:  &Solution,
    threshold: Option<usize>,
    mode:      ConflictMode,
) -> bool {
    match check_solution(instance, solution, threshold, mode) {
        Ok(()) => true,
        Err(err) => {
            debug!(%err, "infeasible solution");
            false
        }
    }
}

fn reset(owner: &mut [AgentId], positions: &[VertexId]) {
    for v in positions {
        owner[v.index()] = AgentId::INVALID;
    }
}
