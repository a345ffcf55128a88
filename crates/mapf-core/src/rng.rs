//! Deterministic solver RNG wrapper.
//!
//! Every randomised component (PIBT tie-breaking, Scatter planning order,
//! random instance generation) owns its own `SolverRng` seeded from the run's
//! master seed.  Components never share RNG state, so the output of one does
//! not depend on how many draws another made.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Seeded `SmallRng` used by one solver component.
///
/// The type is `Send` but not meant to be shared: a component evaluated on
/// several threads needs one `SolverRng` per thread (see [`child`](Self::child)).
#[derive(Clone, Debug)]
pub struct SolverRng(SmallRng);

impl SolverRng {
    pub fn new(seed: u64) -> Self {
        SolverRng(SmallRng::seed_from_u64(seed))
    }

    /// Derive a child `SolverRng` with a different seed offset, for seeding
    /// per-thread or per-phase RNGs deterministically from the root seed.
    pub fn child(&mut self, offset: u64) -> SolverRng {
        let child_seed: u64 = self.0.r#gen::<u64>() ^ offset.wrapping_mul(MIXING_CONSTANT);
        SolverRng(SmallRng::seed_from_u64(child_seed))
    }

    /// Uniform `f32` in `[0, 1)`.  Used as a PIBT tie-breaker.
    #[inline]
    pub fn unit_f32(&mut self) -> f32 {
        self.0.r#gen::<f32>()
    }

    /// Fisher-Yates shuffle; drives agent orders and random instances.
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        use rand::seq::SliceRandom;
        slice.shuffle(&mut self.0);
    }
}
