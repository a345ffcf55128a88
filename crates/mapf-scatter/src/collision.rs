//! Collision ledger over a set of single-agent paths.
//!
//! # What is counted
//!
//! For a pair of enrolled paths, every one of the following adds one to
//! [`CollisionTable::collision_cnt`]:
//!
//! * **vertex**: both agents on the same vertex at the same timestep `t ≥ 1`;
//! * **swap**: the two agents traverse one edge in opposite directions
//!   between `t` and `t + 1`;
//! * **goal**: one agent's path ended at `v` at time `t_last` and the other
//!   is on `v` at some `t > t_last` (finished agents are assumed to stay).
//!
//! Each interaction is seen from both sides, so the amount an agent adds on
//! [`enroll_path`](CollisionTable::enroll_path) is exactly what
//! [`clear_path`](CollisionTable::clear_path) removes while the other paths
//! are unchanged.

use mapf_core::{AgentId, VertexId};

/// A path: one vertex per timestep starting at `t = 0`.
pub type Path = Vec<VertexId>;

/// Per-vertex, per-timestep occupancy of the enrolled paths.
pub struct CollisionTable {
    /// `body[v][t]` = agents on `v` at timestep `t`.
    body: Vec<Vec<Vec<AgentId>>>,
    /// `body_last[v]` = `(agent, t_last)` for every path ending at `v`.
    body_last: Vec<Vec<(AgentId, usize)>>,
    /// Total pairwise interactions among the enrolled paths.
    pub collision_cnt: usize,
}

impl CollisionTable {
    /// Empty ledger for a graph with `vertex_count` vertices.
    pub fn new(vertex_count: usize) -> Self {
        Self {
            body:          vec![Vec::new(); vertex_count],
            body_last:     vec![Vec::new(); vertex_count],
            collision_cnt: 0,
        }
    }

    /// Interactions created by moving `from -> to` between `t_from` and
    /// `t_from + 1`, against the currently enrolled paths.
    pub fn collision_cost(&self, from: VertexId, to: VertexId, t_from: usize) -> usize {
        let t_to = t_from + 1;
        let mut cnt = 0;

        // vertex
        cnt += self.agents_at(to, t_to).len();

        // swap: someone on `to` at t_from who is on `from` at t_to
        if from != to {
            let arriving = self.agents_at(from, t_to);
            cnt += self
                .agents_at(to, t_from)
                .iter()
                .filter(|j| arriving.contains(j))
                .count();
        }

        // goal
        cnt += self.body_last[to.index()]
            .iter()
            .filter(|&&(_, t_last)| t_last < t_to)
            .count();

        cnt
    }

    /// Register `path` for `agent` and add its interactions to the count.
    ///
    /// An empty path is ignored.
    pub fn enroll_path(&mut self, agent: AgentId, path: &[VertexId]) {
        let Some(&v_last) = path.last() else { return };
        let t_last = path.len() - 1;

        for (t, &v) in path.iter().enumerate() {
            if t > 0 {
                self.collision_cnt += self.collision_cost(path[t - 1], v, t - 1);
            }
            let slots = &mut self.body[v.index()];
            if slots.len() <= t {
                slots.resize_with(t + 1, Vec::new);
            }
            slots[t].push(agent);
        }

        self.collision_cnt += self.arrivals_after(v_last, t_last);
        self.body_last[v_last.index()].push((agent, t_last));
    }

    /// Remove `path` of `agent` and subtract its interactions.
    ///
    /// `path` must be the path previously enrolled for `agent` (or empty).
    pub fn clear_path(&mut self, agent: AgentId, path: &[VertexId]) {
        let Some(&v_last) = path.last() else { return };
        let t_last = path.len() - 1;

        for (t, &v) in path.iter().enumerate() {
            if let Some(slot) = self.body[v.index()].get_mut(t) {
                if let Some(k) = slot.iter().position(|&a| a == agent) {
                    slot.swap_remove(k);
                }
            }
        }
        let last = &mut self.body_last[v_last.index()];
        if let Some(k) = last.iter().position(|&(a, _)| a == agent) {
            last.swap_remove(k);
        }

        let mut removed = self.arrivals_after(v_last, t_last);
        for t in 1..path.len() {
            removed += self.collision_cost(path[t - 1], path[t], t - 1);
        }
        debug_assert!(removed <= self.collision_cnt, "ledger underflow clearing {agent}");
        self.collision_cnt -= removed;
    }

    #[inline]
    fn agents_at(&self, v: VertexId, t: usize) -> &[AgentId] {
        self.body[v.index()].get(t).map_or(&[], Vec::as_slice)
    }

    /// Occupations of `v` strictly after `t_last`.
    fn arrivals_after(&self, v: VertexId, t_last: usize) -> usize {
        self.body[v.index()]
            .iter()
            .skip(t_last + 1)
            .map(Vec::len)
            .sum()
    }
}
