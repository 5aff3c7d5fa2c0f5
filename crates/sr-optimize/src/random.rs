//! Uniform random search: a fixed budget of independent draws.

use sr_core::{Fitness, SimRng};
use tracing::debug;

use crate::strategy::{evaluate_batch, require_bounds};
use crate::{
    Evaluate, GenerationStats, InputBounds, OptimizeError, OptimizeResult, SearchObserver, SearchOutcome,
    SearchStrategy,
};

/// Draws `iterations` schedules uniformly inside the bounds and keeps the best.
///
/// All draws form one batch, evaluated in parallel with the `parallel`
/// feature and reported as a single generation.
#[derive(Clone, Debug)]
pub struct RandomOptimization {
    pub iterations: usize,
    pub seed:       u64,
}

impl RandomOptimization {
    pub fn new(iterations: usize, seed: u64) -> Self {
        Self { iterations, seed }
    }
}

impl SearchStrategy for RandomOptimization {
    fn name(&self) -> &'static str {
        "random"
    }

    fn maximize<E: Evaluate, O: SearchObserver>(
        &self,
        bounds:    &InputBounds,
        evaluator: &E,
        observer:  &mut O,
    ) -> OptimizeResult<SearchOutcome> {
        require_bounds(bounds)?;
        if self.iterations == 0 {
            return Err(OptimizeError::Settings("random search needs at least one iteration".into()));
        }

        let mut rng = SimRng::new(self.seed);
        let schedules: Vec<Vec<f64>> = (0..self.iterations).map(|_| bounds.sample(&mut rng)).collect();
        let scores = evaluate_batch(evaluator, &schedules)?;

        let mut best_index = 0;
        for (i, (schedule, &fitness)) in schedules.iter().zip(&scores).enumerate() {
            observer.on_evaluation(schedule, fitness);
            if fitness > scores[best_index] {
                best_index = i;
            }
        }
        let best = scores[best_index];
        debug!(draws = self.iterations, best = %best, "random batch evaluated");
        observer.on_generation(&GenerationStats::from_fitness(0, &scores, Fitness::WORST));

        let outcome = SearchOutcome {
            best:        schedules[best_index].clone(),
            fitness:     best,
            evaluations: scores.len(),
            generations: 1,
        };
        observer.on_search_end(&outcome);
        Ok(outcome)
    }
}
