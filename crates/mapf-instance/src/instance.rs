//! The `Instance` type: graph + start configuration + goal sequences.

use mapf_core::{AgentId, SolverRng, VertexId};
use mapf_graph::{Config, Graph};

use crate::{InstanceError, InstanceResult};

/// A MAPF problem: `N` agents on one graph, each with a start vertex and a
/// non-empty ordered sequence of goals.
///
/// Invariant: `N == starts.len() == goal_sequences.len()`, enforced by every
/// constructor.  Fields are read-only after construction.
pub struct Instance {
    pub graph: Graph,

    /// Start configuration.  Goal indices already account for agents whose
    /// first goal is their start vertex.
    pub starts: Config,

    /// Ordered waypoints per agent, indexed by `AgentId`.
    pub goal_sequences: Vec<Vec<VertexId>>,
}

impl Instance {
    // ── Construction ──────────────────────────────────────────────────────

    /// Validate inputs and build an instance.
    ///
    /// Fails on mismatched lengths, an empty goal sequence, a vertex id not
    /// in `graph`, or two agents sharing a start vertex.
    pub fn new(
        graph:          Graph,
        starts:         Vec<VertexId>,
        goal_sequences: Vec<Vec<VertexId>>,
    ) -> InstanceResult<Self> {
        let n = starts.len();
        if goal_sequences.len() != n {
            return Err(InstanceError::AgentCountMismatch {
                expected: n,
                got:      goal_sequences.len(),
                what:     "goal sequences",
            });
        }

        let size = graph.size();
        let check = |v: VertexId| {
            if v.index() < size { Ok(()) } else { Err(InstanceError::InvalidVertex(v)) }
        };

        let mut start_owner = vec![AgentId::INVALID; size];
        for (agent, &s) in AgentId::range(n).zip(&starts) {
            check(s)?;
            if start_owner[s.index()].is_valid() {
                return Err(InstanceError::DuplicateStart(agent));
            }
            start_owner[s.index()] = agent;
        }
        for (agent, seq) in AgentId::range(n).zip(&goal_sequences) {
            if seq.is_empty() {
                return Err(InstanceError::EmptyGoalSequence(agent));
            }
            seq.iter().try_for_each(|&g| check(g))?;
        }

        let goal_indices = starts
            .iter()
            .zip(&goal_sequences)
            .map(|(&s, seq)| advance(seq, 0, s))
            .collect();

        Ok(Self {
            graph,
            starts: Config::new(starts, goal_indices),
            goal_sequences,
        })
    }

    /// Build from row-major cell indices (as written in benchmark files and
    /// tests) instead of vertex ids.
    pub fn from_cells(
        graph:       Graph,
        start_cells: &[u32],
        goal_cells:  &[Vec<u32>],
    ) -> InstanceResult<Self> {
        let to_vertex = |cell: u32| graph.vertex_at(cell).ok_or(InstanceError::InvalidCell(cell));

        let starts = start_cells
            .iter()
            .map(|&c| to_vertex(c))
            .collect::<InstanceResult<Vec<_>>>()?;
        let goal_sequences = goal_cells
            .iter()
            .map(|seq| seq.iter().map(|&c| to_vertex(c)).collect::<InstanceResult<Vec<_>>>())
            .collect::<InstanceResult<Vec<_>>>()?;

        Self::new(graph, starts, goal_sequences)
    }

    /// One goal per agent, given as cell indices.
    pub fn from_cells_single_goal(
        graph:       Graph,
        start_cells: &[u32],
        goal_cells:  &[u32],
    ) -> InstanceResult<Self> {
        let seqs: Vec<Vec<u32>> = goal_cells.iter().map(|&g| vec![g]).collect();
        Self::from_cells(graph, start_cells, &seqs)
    }

    /// `n` agents with distinct random starts and distinct random single
    /// goals.
    pub fn random(graph: Graph, n: usize, rng: &mut SolverRng) -> InstanceResult<Self> {
        let available = graph.size();
        if n > available {
            return Err(InstanceError::NotEnoughVertices { requested: n, available });
        }

        let mut pool: Vec<VertexId> = graph.vertices().collect();
        rng.shuffle(&mut pool);
        let starts = pool[..n].to_vec();

        rng.shuffle(&mut pool);
        let goal_sequences = pool[..n].iter().map(|&g| vec![g]).collect();

        Self::new(graph, starts, goal_sequences)
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// Number of agents `N`.
    #[inline]
    pub fn agent_count(&self) -> usize {
        self.goal_sequences.len()
    }

    #[inline]
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Goal `goal_index` of `agent`, clamped to the last goal once the
    /// sequence is complete.
    #[inline]
    pub fn goal(&self, agent: AgentId, goal_index: usize) -> VertexId {
        let seq = &self.goal_sequences[agent.index()];
        seq[goal_index.min(seq.len() - 1)]
    }

    #[inline]
    pub fn final_goal(&self, agent: AgentId) -> VertexId {
        self.goal(agent, usize::MAX)
    }

    /// Total number of waypoints over all agents.
    pub fn total_goals(&self) -> usize {
        self.goal_sequences.iter().map(Vec::len).sum()
    }

    /// `true` if every agent has completed its goal sequence.
    pub fn is_goal_config(&self, config: &Config) -> bool {
        config
            .goal_indices
            .iter()
            .zip(&self.goal_sequences)
            .all(|(&j, seq)| j >= seq.len())
    }

    // ── Goal-index progression ────────────────────────────────────────────

    /// Goal index of `agent` after occupying `v` while heading to goal
    /// `goal_index`.  Advances by at most one.
    #[inline]
    pub fn advance_goal_index(&self, agent: AgentId, goal_index: usize, v: VertexId) -> usize {
        advance(&self.goal_sequences[agent.index()], goal_index, v)
    }

    /// Configuration reached from `q_from` when every agent moves to
    /// `next_positions[i]`, with goal indices advanced for agents arriving at
    /// their current goal.
    pub fn successor(&self, q_from: &Config, next_positions: Vec<VertexId>) -> Config {
        let goal_indices = AgentId::range(self.agent_count())
            .map(|i| self.advance_goal_index(i, q_from.goal_index(i), next_positions[i.index()]))
            .collect();
        Config::new(next_positions, goal_indices)
    }
}

fn advance(seq: &[VertexId], goal_index: usize, v: VertexId) -> usize {
    if goal_index < seq.len() && seq[goal_index] == v { goal_index + 1 } else { goal_index }
}
