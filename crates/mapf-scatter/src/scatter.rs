//! Scatter: iterative congestion reduction over single-agent paths.
//!
//! # Algorithm
//!
//! Each round shuffles the agents and, one agent at a time, removes its path
//! from the [`CollisionTable`], re-plans it with a multi-label A* that prefers
//! low accumulated collision cost, and enrolls the new path.  Rounds repeat
//! until the collision count is zero, a completed round fails to strictly
//! improve on the best one, or the deadline expires.  The deadline is polled
//! between agents only; a round cut short is discarded and the best completed
//! round is kept.
//!
//! # Search state
//!
//! A* state is `(vertex, label)` where `label` is the goal index the agent is
//! heading to.  Arriving at goal `label` advances it; the search succeeds
//! once every goal has been visited.  Moves only, no waits.
//!
//! Open-list key, ascending: collision cost, `f = g + h`, then vertex id
//! with the larger id first.  `h` is the distance to the current label's
//! goal plus the lengths of all remaining legs.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, info};

use mapf_core::{AgentId, Deadline, SolverConfig, SolverRng, VertexId};
use mapf_dist::DistTable;
use mapf_instance::Instance;

use crate::collision::{CollisionTable, Path};

// ── Hints ─────────────────────────────────────────────────────────────────────

/// Preferred successor per `(agent, label, vertex)`.
#[derive(Clone, Debug, Default)]
pub struct ScatterHints {
    per_agent: Vec<FxHashMap<(usize, VertexId), VertexId>>,
}

impl ScatterHints {
    /// Build hints from planned paths and the label held at each step.
    pub fn from_paths(paths: &[Path], labels: &[Vec<usize>]) -> Self {
        let per_agent = paths
            .iter()
            .zip(labels)
            .map(|(path, label)| {
                path.windows(2)
                    .zip(label)
                    .map(|(step, &l)| ((l, step[0]), step[1]))
                    .collect()
            })
            .collect();
        Self { per_agent }
    }

    /// Suggested next vertex for `agent` at `vertex` while heading to goal
    /// `label`.
    #[inline]
    pub fn get(&self, agent: AgentId, label: usize, vertex: VertexId) -> Option<VertexId> {
        self.per_agent.get(agent.index())?.get(&(label, vertex)).copied()
    }

    /// Number of hints stored for `agent`.
    pub fn count(&self, agent: AgentId) -> usize {
        self.per_agent.get(agent.index()).map_or(0, FxHashMap::len)
    }
}

// ── Scatter ───────────────────────────────────────────────────────────────────

/// Result of a Scatter run.
pub struct Scatter {
    /// Best completed round's path per agent.  Empty when the search failed
    /// or no round completed.
    pub paths: Vec<Path>,
    /// `labels[i][t]` = goal index agent `i` heads to while on `paths[i][t]`.
    pub labels: Vec<Vec<usize>>,
    /// Collision count of the retained round.
    pub collision_cnt: usize,
    /// Rounds started, including a discarded one.
    pub rounds: usize,
    pub hints: ScatterHints,
}

impl Scatter {
    /// Run Scatter to completion (or until `deadline`).
    pub fn new(
        instance: &Instance,
        dist:     &DistTable,
        config:   &SolverConfig,
        deadline: Option<&Deadline>,
    ) -> Self {
        Self::run(instance, dist, config, || deadline.is_some_and(Deadline::is_expired))
    }

    /// [`Scatter::new`] with an arbitrary stop condition.  `stop` is polled
    /// before each agent is planned and after each improving round.
    pub(crate) fn run(
        instance: &Instance,
        dist:     &DistTable,
        config:   &SolverConfig,
        mut stop: impl FnMut() -> bool,
    ) -> Self {
        let n = instance.agent_count();
        let mut rng = SolverRng::new(config.seed);
        let mut ct = CollisionTable::new(instance.graph().size());
        let planner = AgentPlanner { instance, dist, margin: config.scatter_cost_margin };

        let mut paths:  Vec<Path> = vec![Vec::new(); n];
        let mut labels: Vec<Vec<usize>> = vec![Vec::new(); n];
        let mut best: Option<(usize, Vec<Path>, Vec<Vec<usize>>)> = None;
        let mut order: Vec<AgentId> = AgentId::range(n).collect();

        let mut rounds = 0;
        loop {
            rounds += 1;
            rng.shuffle(&mut order);

            let mut interrupted = false;
            for &i in &order {
                if stop() {
                    interrupted = true;
                    break;
                }
                ct.clear_path(i, &paths[i.index()]);
                let (path, label) = planner.plan(i, &ct);
                ct.enroll_path(i, &path);
                paths[i.index()] = path;
                labels[i.index()] = label;
            }
            if interrupted {
                debug!(round = rounds, "scatter round interrupted by deadline");
                break;
            }

            let cnt = ct.collision_cnt;
            debug!(round = rounds, collision_cnt = cnt, "scatter round");

            if best.as_ref().is_some_and(|(b, _, _)| cnt >= *b) {
                break;
            }
            // later rounds replace this only by strictly improving on it
            best = Some((cnt, paths.clone(), labels.clone()));
            if cnt == 0 || stop() {
                break;
            }
        }

        let (collision_cnt, paths, labels) =
            best.unwrap_or_else(|| (0, vec![Vec::new(); n], vec![Vec::new(); n]));
        let hints = ScatterHints::from_paths(&paths, &labels);

        info!(rounds, collision_cnt, "scatter completed");
        Self { paths, labels, collision_cnt, rounds, hints }
    }

    /// Σ over agents of (path length − 1); empty paths count zero.
    pub fn sum_of_path_length(&self) -> usize {
        self.paths.iter().map(|p| p.len().saturating_sub(1)).sum()
    }
}

// ── Single-agent search ───────────────────────────────────────────────────────

struct AgentPlanner<'a> {
    instance: &'a Instance,
    dist:     &'a DistTable,
    margin:   u32,
}

/// Search node stored in the arena.
struct Node {
    vertex: VertexId,
    label:  usize,
    g:      u32,
    parent: Option<usize>,
}

/// Open-list entry.  `BinaryHeap` is a max-heap, so `Ord` puts the entry to
/// expand next on top.
#[derive(PartialEq, Eq)]
struct OpenEntry {
    collision: usize,
    f:         u32,
    vertex:    VertexId,
    node:      usize,
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // smaller collision, smaller f, larger vertex, earlier node
        (Reverse(self.collision), Reverse(self.f), self.vertex, Reverse(self.node))
            .cmp(&(Reverse(other.collision), Reverse(other.f), other.vertex, Reverse(other.node)))
    }
}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl AgentPlanner<'_> {
    /// Plan a path for `agent` visiting its goals in order.  Returns the path
    /// and its per-step labels, or two empty vectors when the bound admits no
    /// path.
    fn plan(&self, agent: AgentId, ct: &CollisionTable) -> (Path, Vec<usize>) {
        let seq   = &self.instance.goal_sequences[agent.index()];
        let start = self.instance.starts.position(agent);
        let label0 = self.instance.starts.goal_index(agent);

        // tail[l] = Σ leg lengths after goal l; tail[len] = 0.
        let mut tail = vec![0u32; seq.len() + 1];
        for l in (0..seq.len().saturating_sub(1)).rev() {
            tail[l] = tail[l + 1] + self.dist.get(agent, l + 1, seq[l]);
        }
        let h = |v: VertexId, label: usize| -> u32 {
            if label >= seq.len() { 0 } else { self.dist.get(agent, label, v) + tail[label] }
        };

        let legs = seq.len().saturating_sub(label0) as u32;
        let upper_bound = h(start, label0) + legs * self.margin;

        let mut arena: Vec<Node> = Vec::new();
        let mut open = BinaryHeap::new();
        let mut closed: FxHashSet<(VertexId, usize)> = FxHashSet::default();

        arena.push(Node { vertex: start, label: label0, g: 0, parent: None });
        open.push(OpenEntry { collision: 0, f: h(start, label0), vertex: start, node: 0 });

        while let Some(entry) = open.pop() {
            let (v, label, g) = {
                let n = &arena[entry.node];
                (n.vertex, n.label, n.g)
            };
            if !closed.insert((v, label)) {
                continue;
            }
            if label >= seq.len() {
                return backtrack(&arena, entry.node);
            }

            for &u in self.instance.graph().neighbors(v) {
                let label_u = if seq[label] == u { label + 1 } else { label };
                let g_u = g + 1;
                let f_u = g_u + h(u, label_u);
                if f_u > upper_bound || closed.contains(&(u, label_u)) {
                    continue;
                }
                let collision = entry.collision + ct.collision_cost(v, u, g as usize);
                arena.push(Node { vertex: u, label: label_u, g: g_u, parent: Some(entry.node) });
                open.push(OpenEntry { collision, f: f_u, vertex: u, node: arena.len() - 1 });
            }
        }

        (Vec::new(), Vec::new())
    }
}

fn backtrack(arena: &[Node], goal: usize) -> (Path, Vec<usize>) {
    let mut path   = Vec::new();
    let mut labels = Vec::new();
    let mut cur = Some(goal);
    while let Some(k) = cur {
        path.push(arena[k].vertex);
        labels.push(arena[k].label);
        cur = arena[k].parent;
    }
    path.reverse();
    labels.reverse();
    (path, labels)
}
