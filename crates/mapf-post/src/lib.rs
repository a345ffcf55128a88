//! `mapf-post` — everything that happens after a solution exists.
//!
//! | Module          | Contents                                                  |
//! |-----------------|-----------------------------------------------------------|
//! | [`feasibility`] | `check_solution`, `is_feasible_solution`                  |
//! | [`metrics`]     | makespan, sum of costs, sum of loss, lower bounds         |
//! | [`log`]         | `SolutionStats`, `write_log` (key=value result file)      |
//! | [`export`]      | `write_solution_csv`                                      |
//! | [`error`]       | `FeasibilityError`, `PostError`, `PostResult<T>`          |

pub mod export;
pub mod error;
pub mod feasibility;
pub mod log;
pub mod metrics;

#[cfg(test)]
mod tests;

pub use export::{SOLUTION_HEADER, write_solution_csv, write_solution_records};
pub use error::{FeasibilityError, PostError, PostResult};
pub use feasibility::{check_solution, is_feasible_solution};
pub use log::{LogHeader, SolutionStats, render_log, write_log};
