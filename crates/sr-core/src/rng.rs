//! Deterministic RNG wrapper for search strategies.
//!
//! Every optimizer run is seeded explicitly so that the same settings and the
//! same seed always reproduce the same best schedule.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Search-level RNG.
///
/// Used only from the thread that drives the search loop.  Fitness
/// evaluation never draws random numbers, so parallel evaluation does not
/// need its own streams.
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    /// Expose the inner `SmallRng` for use with `rand` helpers
    /// (`rand::seq::index::sample`, distributions, …).
    #[inline]
    pub fn inner(&mut self) -> &mut SmallRng {
        &mut self.0
    }

    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    /// `true` with probability `p` (clamped to [0, 1]).
    #[inline]
    pub fn gen_bool(&mut self, p: f64) -> bool {
        self.0.gen_bool(p.clamp(0.0, 1.0))
    }

    /// Uniform sample from `[lo, hi]`; returns `lo` when the interval is
    /// degenerate (`gen_range` panics on empty ranges).
    #[inline]
    pub fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        if hi > lo { self.0.gen_range(lo..=hi) } else { lo }
    }
}
