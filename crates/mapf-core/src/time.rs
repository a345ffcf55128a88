//! Wall-clock deadline for cooperative cancellation.
//!
//! Solver phases poll [`Deadline::is_expired`] at well-defined points only
//! (Scatter checks between agents), so expiry never interrupts a call in the
//! middle of an invariant-carrying update.

use std::fmt;
use std::time::{Duration, Instant};

/// A start instant plus an optional time limit.
///
/// `Deadline` is cheap to copy and holds no heap data.
#[derive(Clone, Copy, Debug)]
pub struct Deadline {
    start: Instant,
    limit: Option<Duration>,
}

impl Deadline {
    /// Deadline expiring `limit_ms` milliseconds from now.
    pub fn new(limit_ms: u64) -> Self {
        Self { start: Instant::now(), limit: Some(Duration::from_millis(limit_ms)) }
    }

    /// A deadline that never expires.  Elapsed time is still tracked.
    pub fn unlimited() -> Self {
        Self { start: Instant::now(), limit: None }
    }

    #[inline]
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Elapsed milliseconds as `f64` (for logs).
    #[inline]
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed().as_secs_f64() * 1_000.0
    }

    #[inline]
    pub fn is_expired(&self) -> bool {
        match self.limit {
            Some(limit) => self.elapsed() >= limit,
            None => false,
        }
    }
}

impl fmt::Display for Deadline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.limit {
            Some(limit) => write!(f, "{:.1}ms / {}ms", self.elapsed_ms(), limit.as_millis()),
            None => write!(f, "{:.1}ms", self.elapsed_ms()),
        }
    }
}
