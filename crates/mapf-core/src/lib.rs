//! `mapf-core` — foundational types for the `mapf` workspace.
//!
//! This crate is a dependency of every other `mapf-*` crate.  It has no
//! `mapf-*` dependencies and only `rand` as an external one (plus optional
//! `serde`).
//!
//! # What lives here
//!
//! | Module      | Contents                                              |
//! |-------------|-------------------------------------------------------|
//! | [`ids`]     | `AgentId`, `VertexId`                                 |
//! | [`rng`]     | `SolverRng`                                           |
//! | [`time`]    | `Deadline`                                            |
//! | [`config`]  | `SolverConfig`, `ConflictMode`                        |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod config;
pub mod ids;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{ConflictMode, SolverConfig};
pub use ids::{AgentId, VertexId};
pub use rng::SolverRng;
pub use time::Deadline;
