//! `sr-optimize`: speed-schedule search for the solar race simulator.
//!
//! Every strategy shares one contract: given [`InputBounds`] and an
//! [`Evaluate`] fitness function, return the best schedule found.  The
//! simulator is treated as a black box through [`RaceObjective`].
//!
//! | Strategy                 | Search                                             |
//! |--------------------------|----------------------------------------------------|
//! | [`GeneticOptimization`]  | k-tournament selection, elitism, crossover, mutation |
//! | [`RandomOptimization`]   | fixed budget of uniform draws                      |
//! | [`BayesianOptimization`] | Gaussian-process surrogate with UCB acquisition    |
//!
//! Drained schedules score [`Fitness::Infeasible`][sr_core::Fitness], below
//! every feasible schedule; they never abort a search.
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                  |
//! |------------|---------------------------------------------------------|
//! | `parallel` | Evaluates each generation on Rayon's thread pool.       |
//! | `serde`    | Serde derives on [`OptimizationSettings`].              |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! let sim = docs.build_simulation(Granularity(1))?;
//! let objective = RaceObjective::for_race(&sim);
//! let bounds = objective.bounds()?;
//! let ga = GeneticOptimization::new(OptimizationSettings::for_schedule(bounds.len()));
//! let outcome = ga.maximize(&bounds, &objective, &mut ProgressLog::default())?;
//! ```

pub mod bayesian;
pub mod bounds;
pub mod error;
pub mod genetic;
pub mod objective;
pub mod observer;
pub mod random;
pub mod settings;
pub mod strategy;

#[cfg(test)]
mod tests;

pub use bayesian::BayesianOptimization;
pub use bounds::InputBounds;
pub use error::{OptimizeError, OptimizeResult};
pub use genetic::GeneticOptimization;
pub use objective::{Evaluate, RaceObjective};
pub use observer::{GenerationStats, NoopObserver, ProgressLog, SearchObserver};
pub use random::RandomOptimization;
pub use settings::{Crossover, OptimizationSettings};
pub use strategy::{SearchOutcome, SearchStrategy};
