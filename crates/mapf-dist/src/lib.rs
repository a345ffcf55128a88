//! `mapf-dist` — the distance oracle.
//!
//! | Module          | Contents                                                 |
//! |-----------------|----------------------------------------------------------|
//! | [`dist_table`]  | `DistTable` — BFS hop counts per `(agent, goal_index)`   |
//! | [`heuristic`]   | `Heuristic` — sum of per-agent distances for a `Config`  |
//!
//! # Feature flags
//!
//! | Flag       | Effect                                                    |
//! |------------|-----------------------------------------------------------|
//! | `parallel` | Runs the BFS passes on Rayon's thread pool.               |

pub mod dist_table;
pub mod heuristic;


pub use dist_table::DistTable;
pub use heuristic::Heuristic;
