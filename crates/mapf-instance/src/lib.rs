//! `mapf-instance` — problem instances and scenario loading.
//!
//! | Module       | Contents                                                   |
//! |--------------|------------------------------------------------------------|
//! | [`instance`] | `Instance` — graph, start `Config`, goal sequences         |
//! | [`scen`]     | `load_scen`, `parse_scen` (MovingAI `.scen` via `csv`)     |
//! | [`error`]    | `InstanceError`, `InstanceResult<T>`                       |
//!
//! Every constructor validates the agent-count invariant and rejects empty
//! goal sequences, so downstream crates (distance table, PIBT, Scatter) can
//! index per-agent arrays without further checks.

pub mod error;
pub mod instance;
pub mod scen;


pub use error::{InstanceError, InstanceResult};
pub use instance::Instance;
pub use scen::{load_scen, parse_scen};
