//! Agent and vertex identifiers.
//!
//! Both are `u32` newtypes with an `INVALID` sentinel, so an occupancy array
//! can be a plain `Vec<AgentId>` instead of `Vec<Option<AgentId>>`.  Index
//! per-agent and per-vertex arrays through `.index()`.

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// `u32::MAX`; marks an empty slot in per-vertex or per-agent arrays.
            pub const INVALID: $name = $name(<$inner>::MAX);

            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }

            /// `true` unless this is the `INVALID` sentinel.
            #[inline(always)]
            pub fn is_valid(self) -> bool {
                self != Self::INVALID
            }
        }

        impl Default for $name {
            /// Returns the `INVALID` sentinel so uninitialized IDs are visibly invalid.
            #[inline(always)]
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl From<$name> for usize {
            #[inline(always)]
            fn from(id: $name) -> usize {
                id.0 as usize
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                <$inner>::try_from(n).map($name)
            }
        }
    };
}

typed_id! {
    /// Index of an agent.  Agent `i` owns slot `i` of every per-agent array
    /// (`Config` positions, goal sequences, scatter paths).
    pub struct AgentId(u32);
}

typed_id! {
    /// Dense index of a passable vertex in a `Graph`.
    ///
    /// Obstacle cells never receive a `VertexId`; the row-major cell index
    /// (which does count obstacles) is a separate value stored on the graph.
    pub struct VertexId(u32);
}

impl AgentId {
    /// Iterator over `AgentId(0) .. AgentId(count)`.
    pub fn range(count: usize) -> impl Iterator<Item = AgentId> + Clone {
        (0..count as u32).map(AgentId)
    }
}
