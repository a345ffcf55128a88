//! Unit tests for mapf-post.

#[cfg(test)]
mod helpers {
    use mapf_core::VertexId;
    use mapf_graph::{Config, Graph, Solution};
    use mapf_instance::Instance;

    /// 8×8 empty grid; agent 0 goes (0,0) → (1,1), agent 1 goes (0,1) → (1,0).
    pub fn crossing_instance() -> Instance {
        Instance::from_cells_single_goal(Graph::empty_grid(8, 8), &[0, 8], &[9, 1]).unwrap()
    }

    /// Solution from rows of cell indices.  Goal indices are left at zero.
    pub fn solution(rows: &[&[u32]]) -> Solution {
        rows.iter()
            .map(|row| Config::from_positions(row.iter().map(|&c| VertexId(c)).collect()))
            .collect()
    }

    pub fn valid_solution() -> Solution {
        solution(&[&[0, 8], &[1, 8], &[9, 0], &[9, 1]])
    }
}

// ── Feasibility ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod feasibility {
    use mapf_core::{AgentId, ConflictMode};
    use mapf_graph::Config;
    use mapf_instance::Instance;

    use super::helpers::{crossing_instance, solution, valid_solution};
    use crate::{FeasibilityError, check_solution, is_feasible_solution};

    const DISALLOWED: ConflictMode = ConflictMode::FollowingDisallowed;
    const ALLOWED: ConflictMode = ConflictMode::FollowingAllowed;

    #[test]
    fn valid_in_both_modes() {
        let ins = crossing_instance();
        let sol = valid_solution();
        assert_eq!(check_solution(&ins, &sol, None, DISALLOWED), Ok(()));
        assert_eq!(check_solution(&ins, &sol, None, ALLOWED), Ok(()));
        assert!(is_feasible_solution(&ins, &sol, None, DISALLOWED));
    }

    #[test]
    fn empty_solution() {
        let ins = crossing_instance();
        assert_eq!(check_solution(&ins, &Vec::new(), None, DISALLOWED), Err(FeasibilityError::EmptySolution));
    }

    #[test]
    fn wrong_agent_count() {
        let ins = crossing_instance();
        let mut sol = solution(&[&[0, 8]]);
        sol.push(Config::from_positions(vec![mapf_core::VertexId(1)]));
        assert_eq!(
            check_solution(&ins, &sol, None, DISALLOWED),
            Err(FeasibilityError::AgentCountMismatch { t: 1, expected: 2, got: 1 })
        );
    }

    #[test]
    fn wrong_start() {
        let ins = crossing_instance();
        let sol = solution(&[&[0, 4], &[1, 8], &[9, 0], &[9, 1]]);
        assert_eq!(
            check_solution(&ins, &sol, None, DISALLOWED),
            Err(FeasibilityError::StartMismatch { agent: AgentId(1) })
        );
    }

    #[test]
    fn teleport() {
        let ins = crossing_instance();
        let sol = solution(&[&[0, 8], &[10, 8]]);
        assert_eq!(
            check_solution(&ins, &sol, Some(0), DISALLOWED),
            Err(FeasibilityError::InvalidTransition { agent: AgentId(0), t: 1 })
        );
    }

    #[test]
    fn shared_vertex() {
        let ins = crossing_instance();
        let sol = solution(&[&[0, 8], &[1, 8], &[9, 0], &[1, 1]]);
        assert_eq!(
            check_solution(&ins, &sol, None, ALLOWED),
            Err(FeasibilityError::VertexConflict { a: AgentId(0), b: AgentId(1), t: 3 })
        );
    }

    #[test]
    fn following_depends_on_mode() {
        let ins = crossing_instance();
        // agent 1 enters (0,0) as agent 0 leaves it
        let sol = solution(&[&[0, 8], &[1, 0], &[9, 1], &[9, 1]]);
        assert_eq!(
            check_solution(&ins, &sol, None, DISALLOWED),
            Err(FeasibilityError::FollowingConflict { agent: AgentId(1), leader: AgentId(0), t: 1 })
        );
        assert_eq!(check_solution(&ins, &sol, None, ALLOWED), Ok(()));
    }

    #[test]
    fn swap_rejected_in_both_modes() {
        let ins = Instance::from_cells_single_goal(mapf_graph::Graph::empty_grid(8, 8), &[0, 1], &[1, 0]).unwrap();
        let sol = solution(&[&[0, 1], &[1, 0]]);
        assert_eq!(
            check_solution(&ins, &sol, None, ALLOWED),
            Err(FeasibilityError::SwapConflict { a: AgentId(0), b: AgentId(1), t: 1 })
        );
        assert!(!is_feasible_solution(&ins, &sol, None, DISALLOWED));
    }

    #[test]
    fn goals_counted_against_threshold() {
        let ins = crossing_instance();
        let sol = solution(&[&[0, 8], &[1, 8], &[2, 0]]);
        assert_eq!(
            check_solution(&ins, &sol, None, DISALLOWED),
            Err(FeasibilityError::NotEnoughGoals { reached: 0, required: 2 })
        );
        assert_eq!(check_solution(&ins, &sol, Some(0), DISALLOWED), Ok(()));
    }

    #[test]
    fn passing_through_goal_counts() {
        // agent 0 touches (1,1) at t=2 and leaves again
        let ins = crossing_instance();
        let sol = solution(&[&[0, 8], &[1, 8], &[9, 0], &[10, 1]]);
        assert_eq!(check_solution(&ins, &sol, None, DISALLOWED), Ok(()));
    }

    #[test]
    fn waypoints_in_order() {
        // goals (1,0) then (0,0); reaching (0,0) first does not count
        let graph = mapf_graph::Graph::empty_grid(8, 8);
        let ins = Instance::from_cells(graph, &[2], &[vec![1, 0]]).unwrap();
        let in_order = solution(&[&[2], &[1], &[0], &[1]]);
        assert_eq!(check_solution(&ins, &in_order, None, DISALLOWED), Ok(()));

        let skipped = solution(&[&[2], &[10], &[9], &[8], &[0]]);
        assert_eq!(
            check_solution(&ins, &skipped, None, DISALLOWED),
            Err(FeasibilityError::NotEnoughGoals { reached: 0, required: 2 })
        );
    }
}

// ── Metrics ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod metrics {
    use mapf_core::{AgentId, VertexId};
    use mapf_dist::DistTable;
    use mapf_graph::Graph;
    use mapf_instance::Instance;

    use super::helpers::solution;
    use crate::metrics::*;

    fn ids(cells: &[u32]) -> Vec<VertexId> {
        cells.iter().map(|&c| VertexId(c)).collect()
    }

    #[test]
    fn solution_metrics() {
        let sol = solution(&[&[0, 5, 10], &[1, 4, 11], &[2, 4, 11]]);
        assert_eq!(makespan(&sol), 2);
        assert_eq!(path_cost(&sol, AgentId(0)), 2);
        assert_eq!(path_cost(&sol, AgentId(1)), 1);
        assert_eq!(sum_of_costs(&sol), 4);
        assert_eq!(sum_of_loss(&sol), 4);
        assert_eq!(sum_of_loss_of(&sol, &[AgentId(1), AgentId(2)]), 2);
    }

    #[test]
    fn empty_solution_is_zero() {
        let sol = Vec::new();
        assert_eq!(makespan(&sol), 0);
        assert_eq!(sum_of_costs(&sol), 0);
        assert_eq!(sum_of_loss(&sol), 0);
    }

    #[test]
    fn cost_and_loss_differ_on_early_waits() {
        // waits before leaving count towards both
        let waited = ids(&[0, 0, 1, 1]);
        assert_eq!(path_cost_of(&waited), 2);
        assert_eq!(path_loss(&waited), 2);

        // leaving the goal and coming back
        let returned = ids(&[0, 1, 0]);
        assert_eq!(path_cost_of(&returned), 2);
        assert_eq!(path_loss(&returned), 2);

        let resting = ids(&[3, 3, 3]);
        assert_eq!(path_cost_of(&resting), 0);
        assert_eq!(path_loss(&resting), 0);
    }

    #[test]
    fn path_metrics() {
        let paths = vec![ids(&[0, 1, 2]), ids(&[5]), ids(&[0, 0, 1, 1])];
        assert_eq!(makespan_paths(&paths), 3);
        assert_eq!(sum_of_costs_paths(&paths), 4);
        assert_eq!(sum_of_loss_paths(&paths), 4);
        assert_eq!(makespan_paths(&[]), 0);
    }

    #[test]
    fn lower_bounds_single_goal() {
        let ins = Instance::from_cells_single_goal(Graph::empty_grid(8, 8), &[0, 5, 10], &[2, 4, 11]).unwrap();
        let d = DistTable::new(&ins);
        assert_eq!(makespan_lower_bound(&ins, &d), 2);
        assert_eq!(sum_of_costs_lower_bound(&ins, &d), 4);
    }

    #[test]
    fn lower_bounds_follow_the_tour() {
        let graph = Graph::empty_grid(8, 8);
        // (0,0) → (2,0) → (2,2), and a start on its own first goal
        let ins = Instance::from_cells(graph, &[0, 7], &[vec![2, 18], vec![7, 4]]).unwrap();
        let d = DistTable::new(&ins);
        assert_eq!(makespan_lower_bound(&ins, &d), 4);
        assert_eq!(sum_of_costs_lower_bound(&ins, &d), 4 + 3);
    }
}

// ── Result log ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod log {
    use mapf_core::ConflictMode;
    use mapf_dist::DistTable;
    use tempfile::TempDir;

    use super::helpers::{crossing_instance, solution, valid_solution};
    use crate::{LogHeader, SolutionStats, render_log, write_log};

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    fn header(short: bool) -> LogHeader<'static> {
        LogHeader { map_name: "empty-8-8.map", solver: "pibt", seed: 7, short }
    }

    #[test]
    fn stats_of_valid_solution() {
        let ins = crossing_instance();
        let d = DistTable::new(&ins);
        let stats = SolutionStats::new(&ins, &d, &valid_solution(), ConflictMode::FollowingDisallowed, 1.5);
        assert!(stats.solved);
        assert_eq!(stats.agents, 2);
        assert_eq!(stats.makespan, 3);
        assert_eq!(stats.makespan_lb, 2);
        assert_eq!(stats.soc, 5);
        assert_eq!(stats.soc_lb, 4);
        assert_eq!(stats.sum_of_loss, 5);
        assert!(stats.to_string().starts_with("solved: true"));
    }

    #[test]
    fn stats_of_partial_solution() {
        let ins = crossing_instance();
        let d = DistTable::new(&ins);
        let sol = solution(&[&[0, 8], &[1, 8]]);
        let stats = SolutionStats::new(&ins, &d, &sol, ConflictMode::FollowingDisallowed, 0.0);
        assert!(!stats.solved);
        assert_eq!(stats.makespan, 1);
    }

    #[test]
    fn rendered_log_lines() {
        let ins = crossing_instance();
        let d = DistTable::new(&ins);
        let sol = valid_solution();
        let stats = SolutionStats::new(&ins, &d, &sol, ConflictMode::FollowingDisallowed, 0.0);

        let mut buf = Vec::new();
        render_log(&mut buf, &header(false), &ins, &sol, &stats).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "agents=2");
        assert_eq!(lines[1], "map_file=empty-8-8.map");
        assert_eq!(lines[2], "solver=pibt");
        assert_eq!(lines[3], "solved=1");
        assert_eq!(lines[4], "soc=5");
        assert!(lines.contains(&"seed=7"));
        assert!(lines.contains(&"starts=(0,0),(0,1),"));

        let goals = lines.iter().position(|l| *l == "goals=").unwrap();
        assert_eq!(lines[goals + 1], "(1,1),");
        assert_eq!(lines[goals + 2], "(1,0),");
        assert_eq!(lines[goals + 3], "solution=");
        assert_eq!(lines[goals + 4], "0:(0,0),(0,1),");
        assert_eq!(lines.last(), Some(&"3:(1,1),(1,0),"));
    }

    #[test]
    fn short_log_omits_solution() {
        let ins = crossing_instance();
        let d = DistTable::new(&ins);
        let sol = valid_solution();
        let stats = SolutionStats::new(&ins, &d, &sol, ConflictMode::FollowingDisallowed, 0.0);

        let mut buf = Vec::new();
        render_log(&mut buf, &header(true), &ins, &sol, &stats).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(!text.contains("solution="));
        assert!(text.ends_with("(1,0),\n"));
    }

    #[test]
    fn writes_file() {
        let dir = tmp();
        let path = dir.path().join("result.txt");
        let ins = crossing_instance();
        let d = DistTable::new(&ins);
        let sol = valid_solution();
        let stats = SolutionStats::new(&ins, &d, &sol, ConflictMode::FollowingDisallowed, 0.0);

        write_log(&path, &header(false), &ins, &sol, &stats).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("agents=2\n"));
        assert_eq!(text.lines().filter(|l| l.contains(":(")).count(), 4);
    }
}

// ── CSV export ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod export {
    use tempfile::TempDir;

    use super::helpers::{crossing_instance, valid_solution};
    use crate::{SOLUTION_HEADER, write_solution_csv};

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    #[test]
    fn one_row_per_agent_per_timestep() {
        let dir = tmp();
        let path = dir.path().join("solution.csv");
        write_solution_csv(&path, &crossing_instance(), &valid_solution()).unwrap();

        let mut rdr = csv::Reader::from_path(&path).unwrap();
        let headers = rdr.headers().unwrap().clone();
        assert_eq!(headers.iter().collect::<Vec<_>>(), SOLUTION_HEADER.to_vec());

        let rows: Vec<csv::StringRecord> = rdr.records().map(Result::unwrap).collect();
        assert_eq!(rows.len(), 8);
        // t=0, agent 1 at (0,1)
        assert_eq!(rows[1].iter().collect::<Vec<_>>(), vec!["0", "1", "0", "1", "8", "0"]);
        // t=3, agent 0 at (1,1)
        assert_eq!(&rows[6][2], "1");
        assert_eq!(&rows[6][3], "1");
        assert_eq!(&rows[6][4], "9");
    }

    #[test]
    fn bad_path_is_an_error() {
        let dir = tmp();
        let path = dir.path().join("missing").join("solution.csv");
        assert!(write_solution_csv(&path, &crossing_instance(), &valid_solution()).is_err());
    }
}
