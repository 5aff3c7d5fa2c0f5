//! The fitness function seen by every search strategy.

use sr_core::Fitness;
use sr_environment::{RouteProfile, Weather};
use sr_sim::{Objective, Simulation};

use crate::{InputBounds, OptimizeResult};

/// A black-box fitness function over speed schedules.  Higher is better.
///
/// Implementations must be pure: the same schedule always scores the same,
/// and calls may run concurrently (hence `Sync`).
pub trait Evaluate: Sync {
    fn evaluate(&self, schedule: &[f64]) -> OptimizeResult<Fitness>;
}

impl<F> Evaluate for F
where
    F: Fn(&[f64]) -> OptimizeResult<Fitness> + Sync,
{
    fn evaluate(&self, schedule: &[f64]) -> OptimizeResult<Fitness> {
        self(schedule)
    }
}

/// Scores schedules by running a [`Simulation`].
pub struct RaceObjective<'a, R: RouteProfile, W: Weather> {
    sim:       &'a Simulation<R, W>,
    objective: Objective,
}

impl<'a, R: RouteProfile, W: Weather> RaceObjective<'a, R, W> {
    pub fn new(sim: &'a Simulation<R, W>, objective: Objective) -> Self {
        Self { sim, objective }
    }

    /// Uses the race type's natural objective.
    pub fn for_race(sim: &'a Simulation<R, W>) -> Self {
        Self::new(sim, Objective::default_for(sim.config().race_type))
    }

    #[inline]
    pub fn objective(&self) -> Objective {
        self.objective
    }

    /// The simulation's speed limits at every driving division.
    pub fn bounds(&self) -> OptimizeResult<InputBounds> {
        let (lo, hi) = self.sim.speed_bounds();
        InputBounds::uniform(self.sim.get_driving_time_divisions(), lo, hi)
    }
}

impl<R: RouteProfile, W: Weather> Evaluate for RaceObjective<'_, R, W> {
    fn evaluate(&self, schedule: &[f64]) -> OptimizeResult<Fitness> {
        Ok(self.sim.fitness(schedule, self.objective)?)
    }
}
