//! Unit tests for mapf-scatter.

#[cfg(test)]
mod helpers {
    use mapf_core::VertexId;
    use mapf_graph::Graph;
    use mapf_instance::Instance;

    pub fn path(ids: &[u32]) -> Vec<VertexId> {
        ids.iter().map(|&i| VertexId(i)).collect()
    }

    pub fn cells(ins: &Instance, p: &[VertexId]) -> Vec<u32> {
        p.iter().map(|&v| ins.graph.cell_index(v)).collect()
    }

    pub fn two_agents_8x8() -> Instance {
        Instance::from_cells_single_goal(Graph::empty_grid(8, 8), &[8, 17], &[18, 1]).unwrap()
    }
}

// ── Collision ledger ──────────────────────────────────────────────────────────

#[cfg(test)]
mod ledger {
    use mapf_core::{AgentId, VertexId};

    use super::helpers::path;
    use crate::CollisionTable;

    #[test]
    fn disjoint_paths_do_not_collide() {
        let mut ct = CollisionTable::new(9);
        ct.enroll_path(AgentId(0), &path(&[0, 1, 2]));
        ct.enroll_path(AgentId(1), &path(&[6, 7, 8]));
        assert_eq!(ct.collision_cnt, 0);
    }

    #[test]
    fn vertex_collision() {
        let mut ct = CollisionTable::new(9);
        ct.enroll_path(AgentId(0), &path(&[0, 1, 2]));
        // cost of stepping 4 -> 1 at t = 0 sees agent 0 at (1, 1)
        assert_eq!(ct.collision_cost(VertexId(4), VertexId(1), 0), 1);
        ct.enroll_path(AgentId(1), &path(&[4, 1, 7]));
        assert_eq!(ct.collision_cnt, 1);
    }

    #[test]
    fn swap_collision() {
        let mut ct = CollisionTable::new(9);
        ct.enroll_path(AgentId(0), &path(&[0, 1]));
        assert_eq!(ct.collision_cost(VertexId(1), VertexId(0), 0), 1);
        ct.enroll_path(AgentId(1), &path(&[1, 0]));
        // swap plus agent 1 ending where agent 0 started is not a goal hit
        assert_eq!(ct.collision_cnt, 1);
    }

    #[test]
    fn goal_collision_either_order() {
        // agent 0 parks on 1 at t = 1; agent 1 passes 1 at t = 2
        let parked = path(&[0, 1]);
        let passer = path(&[3, 4, 1, 2]);

        let mut a = CollisionTable::new(9);
        a.enroll_path(AgentId(0), &parked);
        a.enroll_path(AgentId(1), &passer);

        let mut b = CollisionTable::new(9);
        b.enroll_path(AgentId(1), &passer);
        b.enroll_path(AgentId(0), &parked);

        assert_eq!(a.collision_cnt, 1);
        assert_eq!(b.collision_cnt, 1);
    }

    #[test]
    fn clear_undoes_enroll() {
        let mut ct = CollisionTable::new(9);
        ct.enroll_path(AgentId(0), &path(&[0, 1, 2]));
        ct.enroll_path(AgentId(1), &path(&[2, 1, 0]));
        ct.enroll_path(AgentId(2), &path(&[4, 1]));
        let full = ct.collision_cnt;
        assert!(full > 0);

        ct.clear_path(AgentId(2), &path(&[4, 1]));
        ct.clear_path(AgentId(1), &path(&[2, 1, 0]));
        assert_eq!(ct.collision_cnt, 0);

        ct.enroll_path(AgentId(1), &path(&[2, 1, 0]));
        ct.enroll_path(AgentId(2), &path(&[4, 1]));
        assert_eq!(ct.collision_cnt, full);
    }

    #[test]
    fn empty_path_is_ignored() {
        let mut ct = CollisionTable::new(4);
        ct.enroll_path(AgentId(0), &[]);
        ct.clear_path(AgentId(0), &[]);
        assert_eq!(ct.collision_cnt, 0);
    }
}

// ── Scatter ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod scatter {
    use mapf_core::{AgentId, Deadline, SolverConfig};
    use mapf_dist::DistTable;
    use mapf_graph::Graph;
    use mapf_instance::Instance;

    use super::helpers::{cells, two_agents_8x8};
    use crate::Scatter;

    #[test]
    fn two_by_two_round_trip() {
        let ins = Instance::from_cells(Graph::empty_grid(2, 2), &[0], &[vec![3, 0]]).unwrap();
        let dist = DistTable::new(&ins);
        let config = SolverConfig { scatter_cost_margin: 0, ..SolverConfig::default() };
        let sc = Scatter::new(&ins, &dist, &config, None);

        let p = cells(&ins, &sc.paths[0]);
        assert_eq!(p.len(), 5);
        assert_eq!(p[0], 0);
        assert!(p[1] == 1 || p[1] == 2);
        assert_eq!(p[2], 3);
        assert!(p[3] == 1 || p[3] == 2);
        assert_eq!(p[4], 0);
        assert_eq!(sc.labels[0], vec![0, 0, 1, 1, 2]);
    }

    #[test]
    fn two_agents_expected_paths() {
        let ins = two_agents_8x8();
        let dist = DistTable::new(&ins);
        let sc = Scatter::new(&ins, &dist, &SolverConfig::default(), None);

        assert_eq!(cells(&ins, &sc.paths[0]), vec![8, 16, 17, 18]);
        assert_eq!(cells(&ins, &sc.paths[1]), vec![17, 9, 1]);
        assert_eq!(sc.collision_cnt, 0);
        assert_eq!(sc.rounds, 1);
        assert_eq!(sc.sum_of_path_length(), 5);
    }

    #[test]
    fn hints_follow_paths() {
        let ins = two_agents_8x8();
        let dist = DistTable::new(&ins);
        let sc = Scatter::new(&ins, &dist, &SolverConfig::default(), None);

        let p = &sc.paths[0];
        assert_eq!(sc.hints.get(AgentId(0), 0, p[0]), Some(p[1]));
        assert_eq!(sc.hints.get(AgentId(0), 0, p[2]), Some(p[3]));
        assert_eq!(sc.hints.get(AgentId(0), 0, p[3]), None);
        assert_eq!(sc.hints.get(AgentId(0), 1, p[0]), None);
        assert_eq!(sc.hints.count(AgentId(0)), 3);
        assert_eq!(sc.hints.count(AgentId(1)), 2);
    }

    #[test]
    fn deterministic_for_seed() {
        let ins = Instance::from_cells_single_goal(
            Graph::empty_grid(6, 6),
            &[0, 5, 30, 35, 14],
            &[35, 30, 5, 0, 21],
        )
        .unwrap();
        let dist = DistTable::new(&ins);
        let config = SolverConfig { seed: 7, ..SolverConfig::default() };
        let a = Scatter::new(&ins, &dist, &config, None);
        let b = Scatter::new(&ins, &dist, &config, None);
        assert_eq!(a.paths, b.paths);
        assert_eq!(a.collision_cnt, b.collision_cnt);
        for p in &a.paths {
            assert!(!p.is_empty());
        }
    }

    #[test]
    fn expired_deadline_yields_no_hints() {
        let ins = two_agents_8x8();
        let dist = DistTable::new(&ins);
        let deadline = Deadline::new(0);
        let sc = Scatter::new(&ins, &dist, &SolverConfig::default(), Some(&deadline));
        assert!(sc.paths.iter().all(Vec::is_empty));
        assert_eq!(sc.hints.count(AgentId(0)), 0);
        assert!(sc.hints.get(AgentId(0), 0, ins.starts.position(AgentId(0))).is_none());
    }

    #[test]
    fn unreachable_goal_gives_empty_path() {
        let text = "height 1\nwidth 3\nmap\n.@.\n";
        let graph = mapf_graph::parse_map(std::io::Cursor::new(text)).unwrap();
        let ins = Instance::from_cells_single_goal(graph, &[0], &[2]).unwrap();
        let dist = DistTable::new(&ins);
        let sc = Scatter::new(&ins, &dist, &SolverConfig::default(), None);
        assert!(sc.paths[0].is_empty());
    }
}

// ── Round control ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod rounds {
    use mapf_core::{AgentId, SolverConfig, SolverRng};
    use mapf_dist::DistTable;
    use mapf_graph::Graph;
    use mapf_instance::Instance;

    use crate::{CollisionTable, Path, Scatter};

    /// 1×5 corridor, agents crossing end to end.  With no slack each agent
    /// has exactly one path, so every round meets in the middle.
    fn corridor() -> Instance {
        Instance::from_cells_single_goal(Graph::empty_grid(5, 1), &[0, 4], &[4, 0]).unwrap()
    }

    fn no_slack() -> SolverConfig {
        SolverConfig { scatter_cost_margin: 0, ..SolverConfig::default() }
    }

    /// Collision count of `paths` enrolled into an empty ledger.
    fn recount(ins: &Instance, paths: &[Path]) -> usize {
        let mut ct = CollisionTable::new(ins.graph().size());
        for (i, p) in AgentId::range(paths.len()).zip(paths) {
            ct.enroll_path(i, p);
        }
        ct.collision_cnt
    }

    /// Stop once `n` agents have been planned and the first round is scored.
    fn first_round_only(ins: &Instance, dist: &DistTable, config: &SolverConfig) -> Scatter {
        let n = ins.agent_count();
        let mut calls = 0;
        Scatter::run(ins, dist, config, move || {
            calls += 1;
            calls > n
        })
    }

    fn assert_walks_to_goal(ins: &Instance, sc: &Scatter) {
        let graph = ins.graph();
        for i in AgentId::range(ins.agent_count()) {
            let p = &sc.paths[i.index()];
            assert_eq!(p.first(), Some(&ins.starts.position(i)));
            assert_eq!(p.last(), Some(&ins.final_goal(i)));
            assert!(p.windows(2).all(|w| graph.is_adjacent(w[0], w[1])));
        }
    }

    #[test]
    fn no_improvement_stops_after_second_round() {
        let ins = corridor();
        let dist = DistTable::new(&ins);
        let sc = Scatter::new(&ins, &dist, &no_slack(), None);

        assert_eq!(sc.rounds, 2);
        assert!(sc.collision_cnt > 0);
        assert_eq!(sc.collision_cnt, recount(&ins, &sc.paths));
        assert_eq!(sc.collision_cnt, first_round_only(&ins, &dist, &no_slack()).collision_cnt);
        assert_walks_to_goal(&ins, &sc);
    }

    #[test]
    fn interrupted_round_is_discarded() {
        let ins = corridor();
        let dist = DistTable::new(&ins);
        let first = first_round_only(&ins, &dist, &no_slack());
        assert_eq!(first.rounds, 1);

        // round 1 plans 2 agents and is scored; round 2 stops after 1 agent
        let mut calls = 0;
        let cut = Scatter::run(&ins, &dist, &no_slack(), move || {
            calls += 1;
            calls > 4
        });

        assert_eq!(cut.rounds, 2);
        assert_eq!(cut.paths, first.paths);
        assert_eq!(cut.labels, first.labels);
        assert_eq!(cut.collision_cnt, first.collision_cnt);
        assert_eq!(cut.collision_cnt, recount(&ins, &cut.paths));
        for i in AgentId::range(ins.agent_count()) {
            assert_eq!(cut.hints.count(i), first.hints.count(i));
            let p = &cut.paths[i.index()];
            assert_eq!(cut.hints.get(i, 0, p[0]), Some(p[1]));
        }
    }

    #[test]
    fn congested_runs_keep_best_round() {
        for seed in 0..8 {
            let ins = Instance::random(Graph::empty_grid(6, 6), 20, &mut SolverRng::new(seed)).unwrap();
            let dist = DistTable::new(&ins);
            let config = SolverConfig { seed, ..SolverConfig::default() };

            let sc = Scatter::new(&ins, &dist, &config, None);
            let first = first_round_only(&ins, &dist, &config);

            assert_eq!(sc.collision_cnt, recount(&ins, &sc.paths), "seed {seed}");
            assert!(sc.collision_cnt <= first.collision_cnt, "seed {seed}");
            assert_walks_to_goal(&ins, &sc);
        }
    }
}
