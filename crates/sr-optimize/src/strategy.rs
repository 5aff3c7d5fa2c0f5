//! The common contract of all search strategies.

use sr_core::Fitness;

use crate::{Evaluate, InputBounds, OptimizeError, OptimizeResult, SearchObserver};

/// Best schedule found by a search.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchOutcome {
    pub best:        Vec<f64>,
    pub fitness:     Fitness,
    /// Fitness evaluations performed.
    pub evaluations: usize,
    /// Generations (or batches/iterations) evaluated.
    pub generations: usize,
}

/// Bounds + fitness function → best schedule.
pub trait SearchStrategy {
    fn name(&self) -> &'static str;

    /// Search for the schedule with the highest fitness inside `bounds`.
    ///
    /// Infeasible schedules are scored, never raised; an `Err` from the
    /// evaluator aborts the search.
    fn maximize<E: Evaluate, O: SearchObserver>(
        &self,
        bounds:    &InputBounds,
        evaluator: &E,
        observer:  &mut O,
    ) -> OptimizeResult<SearchOutcome>;
}

pub(crate) fn require_bounds(bounds: &InputBounds) -> OptimizeResult<()> {
    if bounds.is_empty() {
        return Err(OptimizeError::Bounds("no schedule positions to search".into()));
    }
    Ok(())
}

/// Score a batch of schedules, in order.
///
/// With the `parallel` feature the batch runs on Rayon's pool; results keep
/// the input order either way.
pub(crate) fn evaluate_batch<E: Evaluate>(evaluator: &E, schedules: &[Vec<f64>]) -> OptimizeResult<Vec<Fitness>> {
    #[cfg(not(feature = "parallel"))]
    {
        schedules.iter().map(|s| evaluator.evaluate(s)).collect()
    }

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;

        schedules.par_iter().map(|s| evaluator.evaluate(s)).collect()
    }
}
