//! Per-position search bounds.

use sr_core::SimRng;

use crate::{OptimizeError, OptimizeResult};

/// One inclusive `(min, max)` pair per schedule position.
///
/// ```rust,ignore
/// let bounds = InputBounds::new()
///     .add_bounds(6, 0.0, 90.0)?
///     .add_bounds(3, 20.0, 60.0)?;   // slow zone
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InputBounds {
    bounds: Vec<(f64, f64)>,
}

impl InputBounds {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bounds for a whole schedule of `len` positions sharing one range.
    pub fn uniform(len: usize, min: f64, max: f64) -> OptimizeResult<Self> {
        Self::new().add_bounds(len, min, max)
    }

    /// Append `count` positions bounded by `[min, max]`.
    pub fn add_bounds(mut self, count: usize, min: f64, max: f64) -> OptimizeResult<Self> {
        if !(min.is_finite() && max.is_finite() && min <= max) {
            return Err(OptimizeError::Bounds(format!("[{min}, {max}] is not a finite interval")));
        }
        self.bounds.extend(std::iter::repeat_n((min, max), count));
        Ok(self)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bounds.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bounds.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> (f64, f64) {
        self.bounds[index]
    }

    #[inline]
    pub fn as_slice(&self) -> &[(f64, f64)] {
        &self.bounds
    }

    /// Clamp every position of `schedule` into its bounds.
    pub fn clamp(&self, schedule: &mut [f64]) {
        for (x, &(lo, hi)) in schedule.iter_mut().zip(&self.bounds) {
            *x = x.clamp(lo, hi);
        }
    }

    pub fn contains(&self, schedule: &[f64]) -> bool {
        schedule.len() == self.bounds.len()
            && schedule.iter().zip(&self.bounds).all(|(&x, &(lo, hi))| x >= lo && x <= hi)
    }

    /// A schedule drawn uniformly inside the bounds.
    pub fn sample(&self, rng: &mut SimRng) -> Vec<f64> {
        self.bounds.iter().map(|&(lo, hi)| rng.uniform(lo, hi)).collect()
    }
}
