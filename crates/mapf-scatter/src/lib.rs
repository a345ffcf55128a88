//! `mapf-scatter` — congestion-aware path preprocessing for PIBT.
//!
//! | Module        | Contents                                                   |
//! |---------------|------------------------------------------------------------|
//! | [`collision`] | `CollisionTable` — vertex / swap / goal collision ledger   |
//! | [`scatter`]   | `Scatter` — iterative multi-label A*, `ScatterHints`       |
//!
//! Scatter never produces a solution itself.  Its only output consumed by the
//! solver is [`ScatterHints`], a preferred next vertex per
//! `(agent, goal label, vertex)` that PIBT ranks ahead of its distance order.

pub mod collision;
pub mod scatter;

#[cfg(test)]
mod tests;

pub use collision::{CollisionTable, Path};
pub use scatter::{Scatter, ScatterHints};
