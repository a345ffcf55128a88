//! `mapf-graph` — vertex arena, joint configurations and map loading.
//!
//! # Crate layout
//!
//! | Module     | Contents                                                     |
//! |------------|--------------------------------------------------------------|
//! | [`graph`]  | `Graph` (CSR adjacency), `GraphBuilder`                      |
//! | [`config`] | `Config`, `Solution`, conflict predicates                    |
//! | [`map`]    | `load_map`, `parse_map` (text grid format)                   |
//! | [`error`]  | `GraphError`, `GraphResult<T>`                               |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on `Config`.               |

pub mod config;
pub mod error;
pub mod graph;
pub mod map;


pub use config::{Config, ConfigDisplay, Solution, has_following_conflict, has_swap_conflict};
pub use error::{GraphError, GraphResult};
pub use graph::{Graph, GraphBuilder};
pub use map::{load_map, parse_map};
