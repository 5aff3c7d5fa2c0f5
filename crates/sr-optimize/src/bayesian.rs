//! Sequential surrogate search: a Gaussian process over evaluated schedules
//! proposes the next candidate by maximising an upper confidence bound.
//!
//! Inputs are scaled to the unit cube.  The kernel is a squared-exponential
//! (RBF) with length scale `length_scale · √dims`; observations are
//! standardised before fitting.  Infeasible results are mapped below the
//! worst feasible result seen so far (further below for larger deficits), so
//! the surrogate keeps the feasibility tier of [`Fitness`].

use nalgebra::{Cholesky, DMatrix, DVector, Dyn};
use sr_core::{Fitness, SimRng};
use tracing::debug;

use crate::strategy::{evaluate_batch, require_bounds};
use crate::{
    Evaluate, GenerationStats, InputBounds, OptimizeError, OptimizeResult, SearchObserver, SearchOutcome,
    SearchStrategy,
};

/// Largest diagonal jitter tried before giving up on a factorisation.
const MAX_JITTER_STEPS: usize = 6;

/// Share of acquisition candidates drawn near the incumbent rather than
/// uniformly.
const LOCAL_CANDIDATE_SHARE: f64 = 0.5;

/// Half-width of the local candidate box, in unit-cube coordinates.
const LOCAL_RADIUS: f64 = 0.1;

#[derive(Clone, Debug)]
pub struct BayesianOptimization {
    /// Random schedules evaluated before the surrogate is first fitted.
    pub init_points:  usize,
    /// Surrogate-guided evaluations after the initial design.
    pub n_iter:       usize,
    /// UCB exploration weight.
    pub kappa:        f64,
    /// Random candidates scored by the acquisition function per step.
    pub candidates:   usize,
    pub length_scale: f64,
    /// Observation noise added to the kernel diagonal.
    pub noise:        f64,
    pub seed:         u64,
}

impl BayesianOptimization {
    pub fn new(n_iter: usize, seed: u64) -> Self {
        Self {
            init_points: 3,
            n_iter,
            kappa: 10.0,
            candidates: 2_000,
            length_scale: 0.5,
            noise: 1e-6,
            seed,
        }
    }

    pub fn with_init_points(mut self, init_points: usize) -> Self {
        self.init_points = init_points;
        self
    }

    pub fn with_kappa(mut self, kappa: f64) -> Self {
        self.kappa = kappa;
        self
    }

    fn validate(&self) -> OptimizeResult<()> {
        if self.init_points == 0 {
            return Err(OptimizeError::Settings("Bayesian search needs at least one initial point".into()));
        }
        if !(self.kappa.is_finite() && self.kappa >= 0.0) {
            return Err(OptimizeError::Settings(format!("kappa {} must be finite and >= 0", self.kappa)));
        }
        if !(self.length_scale > 0.0 && self.noise > 0.0) || self.candidates == 0 {
            return Err(OptimizeError::Settings(
                "length_scale, noise and candidates must be positive".into(),
            ));
        }
        Ok(())
    }

    /// Best acquisition value among random candidates in the unit cube.
    fn propose(&self, gp: &GaussianProcess, incumbent: &[f64], rng: &mut SimRng) -> Vec<f64> {
        let mut best = incumbent.to_vec();
        let mut best_ucb = f64::NEG_INFINITY;
        for _ in 0..self.candidates {
            let candidate: Vec<f64> = if rng.gen_bool(LOCAL_CANDIDATE_SHARE) {
                incumbent
                    .iter()
                    .map(|&u| (u + rng.uniform(-LOCAL_RADIUS, LOCAL_RADIUS)).clamp(0.0, 1.0))
                    .collect()
            } else {
                (0..incumbent.len()).map(|_| rng.uniform(0.0, 1.0)).collect()
            };
            let (mean, sd) = gp.predict(&candidate);
            let ucb = mean + self.kappa * sd;
            if ucb > best_ucb {
                best_ucb = ucb;
                best = candidate;
            }
        }
        best
    }
}

impl SearchStrategy for BayesianOptimization {
    fn name(&self) -> &'static str {
        "bayesian"
    }

    fn maximize<E: Evaluate, O: SearchObserver>(
        &self,
        bounds:    &InputBounds,
        evaluator: &E,
        observer:  &mut O,
    ) -> OptimizeResult<SearchOutcome> {
        require_bounds(bounds)?;
        self.validate()?;

        let scale = UnitScale::new(bounds);
        let length_scale = self.length_scale * (bounds.len() as f64).sqrt();
        let mut rng = SimRng::new(self.seed);

        // Initial design.
        let mut schedules: Vec<Vec<f64>> = (0..self.init_points).map(|_| bounds.sample(&mut rng)).collect();
        let mut scores = evaluate_batch(evaluator, &schedules)?;
        for (schedule, &fitness) in schedules.iter().zip(&scores) {
            observer.on_evaluation(schedule, fitness);
        }
        let mut units: Vec<Vec<f64>> = schedules.iter().map(|s| scale.to_unit(s)).collect();
        let mut best_index = argmax(&scores);
        observer.on_generation(&GenerationStats::from_fitness(0, &scores, Fitness::WORST));

        for step in 1..=self.n_iter {
            let targets = standardise(&surrogate_targets(&scores));
            let gp = GaussianProcess::fit(&units, &targets, length_scale, self.noise)?;
            let unit = self.propose(&gp, &units[best_index], &mut rng);

            let mut schedule = scale.to_bounds(&unit);
            bounds.clamp(&mut schedule);
            let fitness = evaluator.evaluate(&schedule)?;
            observer.on_evaluation(&schedule, fitness);
            debug!(step, fitness = %fitness, "surrogate proposal evaluated");

            let best_so_far = scores[best_index];
            schedules.push(schedule);
            units.push(unit);
            scores.push(fitness);
            if fitness > best_so_far {
                best_index = scores.len() - 1;
            }
            observer.on_generation(&GenerationStats::from_fitness(step, &[fitness], best_so_far));
        }

        let outcome = SearchOutcome {
            best:        schedules[best_index].clone(),
            fitness:     scores[best_index],
            evaluations: scores.len(),
            generations: self.n_iter + 1,
        };
        observer.on_search_end(&outcome);
        Ok(outcome)
    }
}

// ── Surrogate ────────────────────────────────────────────────────────────────

struct GaussianProcess {
    inputs:       Vec<Vec<f64>>,
    cholesky:     Cholesky<f64, Dyn>,
    alpha:        DVector<f64>,
    length_scale: f64,
}

impl GaussianProcess {
    fn fit(inputs: &[Vec<f64>], targets: &[f64], length_scale: f64, noise: f64) -> OptimizeResult<Self> {
        let n = inputs.len();
        let kernel = DMatrix::from_fn(n, n, |i, j| rbf(&inputs[i], &inputs[j], length_scale));

        let mut jitter = noise;
        for _ in 0..MAX_JITTER_STEPS {
            let mut k = kernel.clone();
            for i in 0..n {
                k[(i, i)] += jitter;
            }
            if let Some(cholesky) = k.cholesky() {
                let alpha = cholesky.solve(&DVector::from_column_slice(targets));
                return Ok(Self { inputs: inputs.to_vec(), cholesky, alpha, length_scale });
            }
            jitter *= 10.0;
        }
        Err(OptimizeError::Surrogate(format!(
            "kernel matrix over {n} points is not positive definite"
        )))
    }

    /// Posterior mean and standard deviation at `x`.
    fn predict(&self, x: &[f64]) -> (f64, f64) {
        let k = DVector::from_iterator(
            self.inputs.len(),
            self.inputs.iter().map(|xi| rbf(xi, x, self.length_scale)),
        );
        let mean = k.dot(&self.alpha);
        let variance = (1.0 - k.dot(&self.cholesky.solve(&k))).max(0.0);
        (mean, variance.sqrt())
    }
}

fn rbf(a: &[f64], b: &[f64], length_scale: f64) -> f64 {
    let sq: f64 = a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum();
    (-sq / (2.0 * length_scale * length_scale)).exp()
}

/// Map fitness onto one real axis: feasible values as-is, infeasible ones
/// below the worst feasible value by `1 + ln(1 + deficit)`.
pub(crate) fn surrogate_targets(fitness: &[Fitness]) -> Vec<f64> {
    let floor = fitness.iter().filter_map(|f| f.value()).fold(f64::INFINITY, f64::min);
    let floor = if floor.is_finite() { floor } else { 0.0 };
    fitness
        .iter()
        .map(|f| match *f {
            Fitness::Feasible(v) => v,
            Fitness::Infeasible { deficit_wh } => floor - 1.0 - deficit_wh.min(1e12).ln_1p(),
        })
        .collect()
}

fn standardise(values: &[f64]) -> Vec<f64> {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let sd = (values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n).sqrt();
    let sd = if sd > 1e-12 { sd } else { 1.0 };
    values.iter().map(|v| (v - mean) / sd).collect()
}

fn argmax(scores: &[Fitness]) -> usize {
    scores
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.cmp(b.1).then(b.0.cmp(&a.0)))
        .map_or(0, |(i, _)| i)
}

/// Affine map between the bounds box and the unit cube.
struct UnitScale {
    bounds: Vec<(f64, f64)>,
}

impl UnitScale {
    fn new(bounds: &InputBounds) -> Self {
        Self { bounds: bounds.as_slice().to_vec() }
    }

    fn to_unit(&self, x: &[f64]) -> Vec<f64> {
        x.iter()
            .zip(&self.bounds)
            .map(|(&v, &(lo, hi))| if hi > lo { (v - lo) / (hi - lo) } else { 0.5 })
            .collect()
    }

    fn to_bounds(&self, u: &[f64]) -> Vec<f64> {
        u.iter().zip(&self.bounds).map(|(&t, &(lo, hi))| lo + t * (hi - lo)).collect()
    }
}
