//! Search observer trait for progress reporting and data collection.

use sr_core::Fitness;
use tracing::info;

use crate::SearchOutcome;

/// Summary of one evaluated generation (one batch for non-population
/// strategies).
#[derive(Clone, Debug, PartialEq)]
pub struct GenerationStats {
    pub generation:    usize,
    /// Best individual of this generation.
    pub best:          Fitness,
    /// Best individual seen since the search started.
    pub best_so_far:   Fitness,
    /// Mean objective over feasible individuals, if any.
    pub mean_feasible: Option<f64>,
    pub feasible:      usize,
    pub population:    usize,
}

impl GenerationStats {
    /// Compute stats from one generation's fitness values.
    pub fn from_fitness(generation: usize, fitness: &[Fitness], best_so_far: Fitness) -> Self {
        let best = fitness.iter().copied().max().unwrap_or(Fitness::WORST);
        let feasible: Vec<f64> = fitness.iter().filter_map(|f| f.value()).collect();
        let mean_feasible = (!feasible.is_empty()).then(|| feasible.iter().sum::<f64>() / feasible.len() as f64);
        Self {
            generation,
            best,
            best_so_far: best_so_far.best(best),
            mean_feasible,
            feasible: feasible.len(),
            population: fitness.len(),
        }
    }
}

/// Callbacks invoked by every [`SearchStrategy`][crate::SearchStrategy].
///
/// All methods have default no-op implementations.  Callbacks always run on
/// the thread driving the search, even with the `parallel` feature, so
/// implementors need no synchronisation.
pub trait SearchObserver {
    /// Called once per fitness evaluation, in population order.
    fn on_evaluation(&mut self, _schedule: &[f64], _fitness: Fitness) {}

    /// Called after each generation has been evaluated.
    fn on_generation(&mut self, _stats: &GenerationStats) {}

    /// Called once with the final result.
    fn on_search_end(&mut self, _outcome: &SearchOutcome) {}
}

/// A [`SearchObserver`] that does nothing.
pub struct NoopObserver;

impl SearchObserver for NoopObserver {}

/// Logs one `info!` line per generation and one at the end.
pub struct ProgressLog {
    /// Log every `interval`-th generation (the first is always logged).
    pub interval: usize,
}

impl Default for ProgressLog {
    fn default() -> Self {
        Self { interval: 1 }
    }
}

impl SearchObserver for ProgressLog {
    fn on_generation(&mut self, stats: &GenerationStats) {
        if stats.generation % self.interval.max(1) == 0 {
            info!(
                generation  = stats.generation,
                best        = %stats.best,
                best_so_far = %stats.best_so_far,
                feasible    = stats.feasible,
                population  = stats.population,
                "generation evaluated"
            );
        }
    }

    fn on_search_end(&mut self, outcome: &SearchOutcome) {
        info!(
            fitness     = %outcome.fitness,
            evaluations = outcome.evaluations,
            generations = outcome.generations,
            "search finished"
        );
    }
}
