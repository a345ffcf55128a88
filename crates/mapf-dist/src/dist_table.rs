//! Per-agent, per-goal shortest-hop distances.
//!
//! # Layout
//!
//! One row of `|V|` distances per `(agent, goal_index)` pair.  Rows are stored
//! in a flat `Vec` and addressed CSR-style:
//!
//! ```text
//! rows[ row_start[agent] + goal_index ]
//! ```
//!
//! # Construction barrier
//!
//! Every BFS pass writes only its own row.  With the `parallel` feature the
//! passes run on Rayon's pool and are gathered by `collect()`, which returns
//! only after every pass has finished.  A `DistTable` value therefore never
//! exists in a partially filled state.

use std::collections::VecDeque;

use mapf_core::{AgentId, VertexId};
use mapf_graph::Graph;
use mapf_instance::Instance;

/// Immutable `(agent, goal_index, vertex) -> hops` table.
///
/// Entries for vertices outside the goal's connected component hold
/// [`unreachable`](Self::unreachable), which equals `graph.size()` and is
/// larger than any real distance.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct DistTable {
    /// Sentinel for "no path"; equals the vertex count `K`.
    unreachable: u32,
    /// `row_start[i]` = index of agent `i`'s first row.  Length = `N + 1`.
    row_start: Vec<usize>,
    /// One distance row per `(agent, goal_index)`, each of length `K`.
    rows: Vec<Vec<u32>>,
}

impl DistTable {
    /// Run one BFS per `(agent, goal_index)` pair of `instance`.
    pub fn new(instance: &Instance) -> Self {
        let graph = instance.graph();
        let unreachable = graph.size() as u32;

        let mut row_start = Vec::with_capacity(instance.agent_count() + 1);
        row_start.push(0);
        let mut roots: Vec<VertexId> = Vec::with_capacity(instance.total_goals());
        for seq in &instance.goal_sequences {
            roots.extend_from_slice(seq);
            row_start.push(roots.len());
        }

        #[cfg(not(feature = "parallel"))]
        let rows: Vec<Vec<u32>> = roots.iter().map(|&g| bfs(graph, g, unreachable)).collect();

        #[cfg(feature = "parallel")]
        let rows: Vec<Vec<u32>> = {
            use rayon::prelude::*;
            roots.par_iter().map(|&g| bfs(graph, g, unreachable)).collect()
        };

        Self { unreachable, row_start, rows }
    }

    /// Hop distance from `v` to goal `goal_index` of `agent`.
    ///
    /// `goal_index` past the end of the sequence is clamped to the last goal,
    /// so agents that completed their sequence keep steering to the final
    /// goal.
    #[inline]
    pub fn get(&self, agent: AgentId, goal_index: usize, v: VertexId) -> u32 {
        let first = self.row_start[agent.index()];
        let last  = self.row_start[agent.index() + 1] - 1;
        let row   = (first + goal_index).min(last);
        self.rows[row][v.index()]
    }

    /// The "no path" sentinel (`graph.size()`).
    #[inline]
    pub fn unreachable(&self) -> u32 {
        self.unreachable
    }

    /// Number of goals of `agent` (rows owned by it).
    #[inline]
    pub fn goal_count(&self, agent: AgentId) -> usize {
        self.row_start[agent.index() + 1] - self.row_start[agent.index()]
    }
}

// ── BFS ───────────────────────────────────────────────────────────────────────

/// Distances from every vertex to `root` on the undirected graph.
fn bfs(graph: &Graph, root: VertexId, unreachable: u32) -> Vec<u32> {
    let mut dist = vec![unreachable; graph.size()];
    let mut queue = VecDeque::new();

    dist[root.index()] = 0;
    queue.push_back(root);

    while let Some(n) = queue.pop_front() {
        let d_next = dist[n.index()] + 1;
        for &m in graph.neighbors(n) {
            if d_next >= dist[m.index()] {
                continue;
            }
            dist[m.index()] = d_next;
            queue.push_back(m);
        }
    }
    dist
}
