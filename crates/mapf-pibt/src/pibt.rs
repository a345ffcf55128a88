//! Priority Inheritance with Backtracking: one joint step.
//!
//! # Resolver
//!
//! [`Pibt::set_new_config`] resolves agents in the caller's priority order.
//! An agent ranks its candidate vertices and takes the first free one; if
//! that vertex is held by an agent that has not moved yet, the blocker
//! inherits the priority and is resolved first.
//!
//! Inheritance chains run on an explicit stack of [`Frame`]s instead of
//! native recursion.  Every agent is resolved at most once per call, so the
//! stack never grows past `N` frames.
//!
//! # Scratch state
//!
//! `occupied_now` / `occupied_next` map a vertex to the agent on it (now) or
//! heading to it (next), `AgentId::INVALID` otherwise.  Both are all-INVALID
//! between calls.  One `Pibt` owns one set of scratch arrays, so concurrent
//! evaluation of several priority orders needs one `Pibt` per thread.

use std::cmp::Ordering;

use smallvec::SmallVec;
use tracing::trace;

use mapf_core::{AgentId, ConflictMode, SolverConfig, SolverRng, VertexId};
use mapf_dist::DistTable;
use mapf_graph::Config;
use mapf_instance::Instance;
use mapf_scatter::ScatterHints;

// ── Frames ────────────────────────────────────────────────────────────────────

/// A ranked next-vertex option.
#[derive(Copy, Clone, Debug)]
struct Candidate {
    vertex:  VertexId,
    hinted:  bool,
    dist:    u32,
    tie:     f32,
}

impl Candidate {
    fn rank(&self, other: &Self) -> Ordering {
        other
            .hinted
            .cmp(&self.hinted)
            .then(self.dist.cmp(&other.dist))
            .then(self.tie.total_cmp(&other.tie))
    }
}

/// Resolution state of one agent on the inheritance stack.
struct Frame {
    agent:      AgentId,
    /// Sorted, best first.  Grid vertices have at most 4 neighbours + stay.
    candidates: SmallVec<[Candidate; 5]>,
    cursor:     usize,
}

/// What the top frame needs next.
enum Step {
    /// Resolve this blocker before continuing.
    Inherit(AgentId),
    /// The frame is finished.
    Return(bool),
}

// ── Pibt ──────────────────────────────────────────────────────────────────────

/// Reusable single-step transition engine.
pub struct Pibt<'a> {
    instance: &'a Instance,
    dist:     &'a DistTable,
    hints:    Option<&'a ScatterHints>,
    mode:     ConflictMode,
    rng:      SolverRng,

    occupied_now:  Vec<AgentId>,
    occupied_next: Vec<AgentId>,
    prefilled:     Vec<bool>,
    stack:         Vec<Frame>,
}

impl<'a> Pibt<'a> {
    pub fn new(
        instance: &'a Instance,
        dist:     &'a DistTable,
        hints:    Option<&'a ScatterHints>,
        config:   &SolverConfig,
    ) -> Self {
        let v = instance.graph().size();
        Self {
            instance,
            dist,
            hints,
            mode:          config.conflict_mode,
            rng:           SolverRng::new(config.seed),
            occupied_now:  vec![AgentId::INVALID; v],
            occupied_next: vec![AgentId::INVALID; v],
            prefilled:     vec![false; instance.agent_count()],
            stack:         Vec::with_capacity(instance.agent_count()),
        }
    }

    #[inline]
    pub fn conflict_mode(&self) -> ConflictMode {
        self.mode
    }

    /// Fill every `None` entry of `q_to` with a next vertex for that agent.
    ///
    /// Entries already `Some` are treated as constraints and validated
    /// against each other and against `q_from`.  Returns `false` if the
    /// constraints conflict or some top-level agent cannot be placed; in that
    /// case every entry this call filled is reset to `None`.
    ///
    /// `order` must name every agent whose entry is `None`.
    ///
    /// # Panics
    /// Panics if `q_to.len()` differs from the agent count.  Debug builds
    /// also panic if a successful call leaves an entry unfilled.
    pub fn set_new_config(
        &mut self,
        q_from: &Config,
        q_to:   &mut [Option<VertexId>],
        order:  &[AgentId],
    ) -> bool {
        let n = self.instance.agent_count();
        assert_eq!(q_to.len(), n, "q_to has {} entries for {n} agents", q_to.len());

        for i in AgentId::range(n) {
            self.occupied_now[q_from.position(i).index()] = i;
            self.prefilled[i.index()] = q_to[i.index()].is_some();
        }

        let mut success = self.claim_prefilled(q_from, q_to);

        if success {
            for &i in order {
                if q_to[i.index()].is_none() && !self.resolve(i, q_from, q_to) {
                    trace!(agent = i.0, "top-level resolution failed");
                    success = false;
                    break;
                }
            }
        }

        // cleanup
        for i in AgentId::range(n) {
            self.occupied_now[q_from.position(i).index()] = AgentId::INVALID;
            if let Some(v) = q_to[i.index()] {
                self.occupied_next[v.index()] = AgentId::INVALID;
            }
        }
        if !success {
            for (slot, &pre) in q_to.iter_mut().zip(&self.prefilled) {
                if !pre {
                    *slot = None;
                }
            }
        }
        debug_assert!(
            !success || q_to.iter().all(Option::is_some),
            "order left agents without a target"
        );
        success
    }

    /// Mark pre-filled targets in `occupied_next`; `false` on a conflict.
    fn claim_prefilled(&mut self, q_from: &Config, q_to: &[Option<VertexId>]) -> bool {
        for (i, target) in AgentId::range(q_to.len()).zip(q_to) {
            let Some(v) = *target else { continue };
            if self.occupied_next[v.index()].is_valid() {
                trace!(agent = i.0, vertex = v.0, "pre-filled vertex conflict");
                return false;
            }
            self.occupied_next[v.index()] = i;
        }

        for (i, target) in AgentId::range(q_to.len()).zip(q_to) {
            let Some(v) = *target else { continue };
            let j = self.occupied_now[v.index()];
            if !j.is_valid() || j == i {
                continue;
            }
            let allowed = match self.mode {
                ConflictMode::FollowingDisallowed => false,
                ConflictMode::FollowingAllowed => {
                    q_to[j.index()].is_some_and(|w| w != q_from.position(i))
                }
            };
            if !allowed {
                trace!(agent = i.0, occupant = j.0, "pre-filled following conflict");
                return false;
            }
        }
        true
    }

    /// Resolve `root` and every agent it inherits priority to.
    fn resolve(&mut self, root: AgentId, q_from: &Config, q_to: &mut [Option<VertexId>]) -> bool {
        let frame = self.make_frame(root, true, q_from);
        self.stack.push(frame);

        let mut returned: Option<bool> = None;
        loop {
            let step = {
                let Some(frame) = self.stack.last_mut() else { return false };
                advance(
                    frame,
                    returned.take(),
                    self.mode,
                    &self.occupied_now,
                    &mut self.occupied_next,
                    q_from,
                    q_to,
                )
            };
            match step {
                Step::Inherit(j) => {
                    let frame = self.make_frame(j, false, q_from);
                    self.stack.push(frame);
                }
                Step::Return(ok) => {
                    if let Some(done) = self.stack.pop() {
                        if !ok {
                            trace!(agent = done.agent.0, "no free candidate, staying");
                        }
                    }
                    if self.stack.is_empty() {
                        return ok;
                    }
                    returned = Some(ok);
                }
            }
        }
    }

    /// Rank the candidates of `agent`.  Tie-breakers are drawn fresh.
    fn make_frame(&mut self, agent: AgentId, top_level: bool, q_from: &Config) -> Frame {
        let here = q_from.position(agent);
        let goal_index = q_from.goal_index(agent);
        let hint = self.hints.and_then(|h| h.get(agent, goal_index, here));

        let graph = self.instance.graph();
        let with_stay = top_level || self.mode.allows_following();

        let mut candidates: SmallVec<[Candidate; 5]> = SmallVec::new();
        let options = graph.neighbors(here).iter().copied();
        for u in options.chain(with_stay.then_some(here)) {
            candidates.push(Candidate {
                vertex: u,
                hinted: hint == Some(u),
                dist:   self.dist.get(agent, goal_index, u),
                tie:    self.rng.unit_f32(),
            });
        }
        candidates.sort_by(Candidate::rank);

        Frame { agent, candidates, cursor: 0 }
    }
}

/// Run the top frame until it needs a blocker resolved or finishes.
///
/// `returned` carries the outcome of the blocker resolved for this frame's
/// last candidate, if any.
fn advance(
    frame:         &mut Frame,
    returned:      Option<bool>,
    mode:          ConflictMode,
    occupied_now:  &[AgentId],
    occupied_next: &mut [AgentId],
    q_from:        &Config,
    q_to:          &mut [Option<VertexId>],
) -> Step {
    let i = frame.agent;
    let here = q_from.position(i);

    match returned {
        Some(true) => return Step::Return(true),
        Some(false) => {
            match mode {
                // drop the reservation of our own vertex
                ConflictMode::FollowingDisallowed => {
                    occupied_next[here.index()] = AgentId::INVALID;
                }
                // the blocker stays on the candidate and now owns it
                ConflictMode::FollowingAllowed => {}
            }
            q_to[i.index()] = None;
        }
        None => {}
    }

    while let Some(c) = frame.candidates.get(frame.cursor) {
        let u = c.vertex;
        frame.cursor += 1;

        if occupied_next[u.index()].is_valid() {
            continue;
        }

        let j = occupied_now[u.index()];
        if j.is_valid() && j != i {
            match (mode, q_to[j.index()]) {
                (ConflictMode::FollowingDisallowed, None) => {
                    occupied_next[here.index()] = i;
                    q_to[i.index()] = Some(here);
                    return Step::Inherit(j);
                }
                (ConflictMode::FollowingDisallowed, Some(_)) => continue,
                (ConflictMode::FollowingAllowed, Some(w)) if w == here => continue,
                (ConflictMode::FollowingAllowed, Some(_)) => {}
                (ConflictMode::FollowingAllowed, None) => {
                    occupied_next[u.index()] = i;
                    q_to[i.index()] = Some(u);
                    return Step::Inherit(j);
                }
            }
        }

        occupied_next[u.index()] = i;
        q_to[i.index()] = Some(u);
        return Step::Return(true);
    }

    // forced stay
    occupied_next[here.index()] = i;
    q_to[i.index()] = Some(here);
    Step::Return(false)
}
