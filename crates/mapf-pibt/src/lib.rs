//! `mapf-pibt` — the single-timestep transition.
//!
//! | Module   | Contents                                                        |
//! |----------|-----------------------------------------------------------------|
//! | [`pibt`] | `Pibt::set_new_config` — priority inheritance with backtracking |
//! | [`swap`] | `SwapProbe` — corridor swap detection for orchestrators         |
//!
//! A successful [`Pibt::set_new_config`] never yields two agents on one
//! vertex.  Under `ConflictMode::FollowingDisallowed` no agent enters a
//! vertex another agent occupied before the step; under
//! `ConflictMode::FollowingAllowed` no two agents trade vertices.

pub mod pibt;
pub mod swap;


pub use pibt::Pibt;
pub use swap::SwapProbe;
