//! Solver configuration.

use crate::Deadline;

/// Which inter-agent move patterns a single timestep may contain.
///
/// Vertex conflicts (two agents on one vertex) are forbidden in both modes.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ConflictMode {
    /// An agent may not enter a vertex another agent occupied at the previous
    /// timestep.  Chains are resolved by making the pusher wait.
    #[default]
    FollowingDisallowed,
    /// Agent B may enter the vertex agent A vacates in the same timestep; only
    /// A and B trading vertices (a swap) is forbidden.
    FollowingAllowed,
}

impl ConflictMode {
    #[inline]
    pub fn allows_following(self) -> bool {
        matches!(self, ConflictMode::FollowingAllowed)
    }
}

/// Top-level solver configuration.
///
/// Typically built by the application crate and passed to every solver
/// component at construction.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SolverConfig {
    /// Master RNG seed.  The same seed always produces identical results.
    pub seed: u64,

    /// Wall-clock budget in milliseconds.  `None` means unlimited.
    pub time_limit_ms: Option<u64>,

    /// Conflict rules enforced by the step transition and the feasibility
    /// checker.
    pub conflict_mode: ConflictMode,

    /// Slack (in moves) added to every goal leg when bounding a Scatter
    /// single-agent search.
    pub scatter_cost_margin: u32,

    /// Run the Scatter preprocessor and feed its hints to PIBT.
    pub use_scatter: bool,
}

impl SolverConfig {
    /// Construct a `Deadline` starting now, honouring `time_limit_ms`.
    pub fn make_deadline(&self) -> Deadline {
        match self.time_limit_ms {
            Some(ms) => Deadline::new(ms),
            None => Deadline::unlimited(),
        }
    }
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            seed:                0,
            time_limit_ms:       None,
            conflict_mode:       ConflictMode::default(),
            scatter_cost_margin: 2,
            use_scatter:         true,
        }
    }
}
