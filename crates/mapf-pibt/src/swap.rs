//! Swap detection for corridor deadlocks.
//!
//! Two agents facing each other in a corridor cannot pass with PIBT's push
//! moves alone.  [`SwapProbe`] walks the corridor to decide whether the pair
//! must trade places and whether the puller has room to do so.  The probe
//! only answers questions; an orchestrator that wants swaps reorders
//! priorities on its own.

use mapf_core::{AgentId, VertexId};
use mapf_dist::DistTable;
use mapf_graph::Config;
use mapf_instance::Instance;

/// Read-only corridor queries against one configuration.
pub struct SwapProbe<'a> {
    instance: &'a Instance,
    dist:     &'a DistTable,
    config:   &'a Config,
    /// Next-step targets decided so far, if the caller is mid-transition.
    targets:  Option<&'a [Option<VertexId>]>,
    /// Agent on each vertex in `config`.
    occupied: Vec<AgentId>,
}

impl<'a> SwapProbe<'a> {
    pub fn new(instance: &'a Instance, dist: &'a DistTable, config: &'a Config) -> Self {
        let mut occupied = vec![AgentId::INVALID; instance.graph().size()];
        for i in AgentId::range(config.len()) {
            occupied[config.position(i).index()] = i;
        }
        Self { instance, dist, config, targets: None, occupied }
    }

    /// Treat agents with a `Some` entry in `q_to` as already moved: they are
    /// never offered as the occupant to swap with.
    pub fn with_targets(mut self, q_to: &'a [Option<VertexId>]) -> Self {
        self.targets = Some(q_to);
        self
    }

    fn is_decided(&self, agent: AgentId) -> bool {
        self.targets.is_some_and(|q_to| q_to[agent.index()].is_some())
    }

    #[inline]
    fn d(&self, agent: AgentId, v: VertexId) -> u32 {
        self.dist.get(agent, self.config.goal_index(agent), v)
    }

    /// Exits from `v_puller` other than `v_pusher` and dead ends holding an
    /// agent that sits on its current goal.  Returns the count and the last
    /// such exit.
    fn exits(&self, v_pusher: VertexId, v_puller: VertexId) -> (usize, Option<VertexId>) {
        let graph = self.instance.graph();
        let mut n = 0;
        let mut last = None;
        for &u in graph.neighbors(v_puller) {
            let k = self.occupied[u.index()];
            let parked = graph.degree(u) == 1
                && k.is_valid()
                && self.instance.goal(k, self.config.goal_index(k)) == u;
            if u != v_pusher && !parked {
                n += 1;
                last = Some(u);
            }
        }
        (n, last)
    }

    /// `true` if `pusher`, heading through `v_puller`, can only get past
    /// `puller` by trading places with it.
    ///
    /// Walks from `(v_pusher, v_puller)` along the pusher's decreasing
    /// distance while the corridor stays one vertex wide.
    pub fn is_swap_required(
        &self,
        pusher:   AgentId,
        puller:   AgentId,
        v_pusher: VertexId,
        v_puller: VertexId,
    ) -> bool {
        let (mut v_pusher, mut v_puller) = (v_pusher, v_puller);
        for _ in 0..self.instance.graph().size() {
            if self.d(pusher, v_puller) >= self.d(pusher, v_pusher) {
                break;
            }
            match self.exits(v_pusher, v_puller) {
                (n, _) if n >= 2 => return false,
                (_, Some(next)) => {
                    v_pusher = v_puller;
                    v_puller = next;
                }
                _ => break,
            }
        }

        self.d(puller, v_pusher) < self.d(puller, v_puller)
            && (self.d(pusher, v_pusher) == 0 || self.d(pusher, v_puller) < self.d(pusher, v_pusher))
    }

    /// `true` if pulling from `v_puller` away from `v_pusher` reaches a
    /// branch vertex before a dead end or a return to the origin.
    pub fn is_swap_possible(&self, v_pusher: VertexId, v_puller: VertexId) -> bool {
        let origin = v_pusher;
        let (mut v_pusher, mut v_puller) = (v_pusher, v_puller);
        for _ in 0..self.instance.graph().size() {
            if v_puller == origin {
                return false;
            }
            match self.exits(v_pusher, v_puller) {
                (n, _) if n >= 2 => return true,
                (_, Some(next)) => {
                    v_pusher = v_puller;
                    v_puller = next;
                }
                _ => return false,
            }
        }
        false
    }

    /// The agent `agent` should swap with to reach `desired`, if any.
    ///
    /// First checks the occupant of `desired`, unless its target is already
    /// decided (see [`with_targets`](Self::with_targets)).  Otherwise looks for a
    /// neighbour that would need to swap with `agent` once `agent` stands on
    /// `desired` (the clear operation of push-and-swap).
    pub fn is_swap_required_and_possible(&self, agent: AgentId, desired: VertexId) -> Option<AgentId> {
        let here = self.config.position(agent);

        let j = self.occupied[desired.index()];
        if j.is_valid()
            && j != agent
            && !self.is_decided(j)
            && self.is_swap_required(agent, j, here, desired)
            && self.is_swap_possible(desired, here)
        {
            return Some(j);
        }

        if desired == here {
            return None;
        }
        self.instance
            .graph()
            .neighbors(here)
            .iter()
            .map(|&u| self.occupied[u.index()])
            .find(|&k| {
                k.is_valid()
                    && self.config.position(k) != desired
                    && self.is_swap_required(k, agent, here, desired)
                    && self.is_swap_possible(desired, here)
            })
    }
}
