//! Population-based search over speed schedules.
//!
//! # One generation
//!
//! ```text
//!   ① Evaluate:   score every individual without a cached fitness
//!                  (parallel with the `parallel` feature).
//!   ② Rank:       sort by fitness, record the best-ever individual.
//!   ③ Elites:     copy the top `elitism` individuals unchanged.
//!   ④ Mating:     fill a pool of `num_parents` k-tournament winners.
//!   ⑤ Offspring:  crossover of two pool members, then mutation, then
//!                  clamping, until the population is full again.
//! ```
//!
//! The last generation is evaluated but not bred.
//!
//! # Chromosome layout
//!
//! A chromosome has `chromosome_size` genes stretched piecewise-constant over
//! the schedule: position `p` of an `n`-position schedule reads gene
//! `p * chromosome_size / n`.  A gene's bounds are the intersection of the
//! bounds of the positions it covers, so any decoded schedule is in bounds.

use rand::seq::index;
use sr_core::{Fitness, SimRng};
use tracing::{debug, warn};

use crate::settings::{Crossover, OptimizationSettings};
use crate::strategy::{evaluate_batch, require_bounds};
use crate::{
    Evaluate, GenerationStats, InputBounds, OptimizeError, OptimizeResult, SearchObserver, SearchOutcome,
    SearchStrategy,
};

// ── Chromosome layout ────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub(crate) struct ChromosomeLayout {
    /// Gene index of each schedule position.
    gene_of:     Vec<usize>,
    gene_bounds: Vec<(f64, f64)>,
}

impl ChromosomeLayout {
    pub(crate) fn new(bounds: &InputBounds, genes: usize) -> OptimizeResult<Self> {
        let n = bounds.len();
        let gene_of: Vec<usize> = (0..n).map(|p| p * genes / n).collect();

        let mut gene_bounds = vec![(f64::NEG_INFINITY, f64::INFINITY); genes];
        for (p, &g) in gene_of.iter().enumerate() {
            let (lo, hi) = bounds.get(p);
            let b = &mut gene_bounds[g];
            *b = (b.0.max(lo), b.1.min(hi));
        }
        if let Some(g) = gene_bounds.iter().position(|&(lo, hi)| lo > hi) {
            return Err(OptimizeError::Bounds(format!(
                "gene {g} covers schedule positions with disjoint bounds"
            )));
        }
        Ok(Self { gene_of, gene_bounds })
    }

    #[inline]
    pub(crate) fn genes(&self) -> usize {
        self.gene_bounds.len()
    }

    pub(crate) fn decode(&self, genes: &[f64]) -> Vec<f64> {
        self.gene_of.iter().map(|&g| genes[g]).collect()
    }

    /// Average the schedule positions each gene covers.
    pub(crate) fn encode(&self, schedule: &[f64]) -> Vec<f64> {
        let mut sums = vec![0.0; self.genes()];
        let mut counts = vec![0usize; self.genes()];
        for (&g, &x) in self.gene_of.iter().zip(schedule) {
            sums[g] += x;
            counts[g] += 1;
        }
        let mut genes: Vec<f64> = sums.iter().zip(&counts).map(|(s, &c)| s / c.max(1) as f64).collect();
        self.clamp(&mut genes);
        genes
    }

    pub(crate) fn clamp(&self, genes: &mut [f64]) {
        for (x, &(lo, hi)) in genes.iter_mut().zip(&self.gene_bounds) {
            *x = x.clamp(lo, hi);
        }
    }

    fn random(&self, rng: &mut SimRng) -> Vec<f64> {
        self.gene_bounds.iter().map(|&(lo, hi)| rng.uniform(lo, hi)).collect()
    }
}

// ── Individuals ──────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
struct Individual {
    genes:   Vec<f64>,
    /// `None` until evaluated; elites keep theirs across generations.
    fitness: Option<Fitness>,
}

impl Individual {
    fn new(genes: Vec<f64>) -> Self {
        Self { genes, fitness: None }
    }

    #[inline]
    fn score(&self) -> Fitness {
        self.fitness.unwrap_or(Fitness::WORST)
    }
}

// ── GeneticOptimization ──────────────────────────────────────────────────────

/// Tournament-selection genetic algorithm with elitism.
pub struct GeneticOptimization {
    settings:      OptimizationSettings,
    initial_guess: Option<Vec<f64>>,
}

impl GeneticOptimization {
    pub fn new(settings: OptimizationSettings) -> Self {
        Self { settings, initial_guess: None }
    }

    /// Seed the first population with `schedule` (e.g. a cached schedule).
    pub fn with_initial_guess(mut self, schedule: Vec<f64>) -> Self {
        self.initial_guess = Some(schedule);
        self
    }

    #[inline]
    pub fn settings(&self) -> &OptimizationSettings {
        &self.settings
    }

    fn initial_population(&self, layout: &ChromosomeLayout, rng: &mut SimRng) -> Vec<Individual> {
        let mut population = Vec::with_capacity(self.settings.population_size);
        if let Some(guess) = &self.initial_guess {
            population.push(Individual::new(layout.encode(guess)));
        }
        while population.len() < self.settings.population_size {
            population.push(Individual::new(layout.random(rng)));
        }
        population
    }

    /// Winner of one k-way tournament over a population sorted best-first.
    fn tournament(&self, population_len: usize, rng: &mut SimRng) -> usize {
        (0..self.settings.k_tournament)
            .map(|_| rng.gen_range(0..population_len))
            .min()
            .unwrap_or(0)
    }

    fn crossover(&self, a: &[f64], b: &[f64], rng: &mut SimRng) -> Vec<f64> {
        match self.settings.crossover {
            Crossover::SinglePoint => {
                if a.len() < 2 {
                    return a.to_vec();
                }
                let cut = rng.gen_range(1..a.len());
                a[..cut].iter().chain(&b[cut..]).copied().collect()
            }
            Crossover::Uniform => a
                .iter()
                .zip(b)
                .map(|(&x, &y)| if rng.gen_bool(0.5) { x } else { y })
                .collect(),
        }
    }

    fn mutate(&self, genes: &mut [f64], layout: &ChromosomeLayout, rng: &mut SimRng) {
        let count = self.settings.mutated_genes();
        if count == 0 {
            return;
        }
        let max = self.settings.max_mutation;
        for g in index::sample(rng.inner(), genes.len(), count) {
            let (lo, hi) = layout.gene_bounds[g];
            genes[g] += rng.uniform(-max, max) * (hi - lo);
        }
        layout.clamp(genes);
    }

    /// Next generation from a population sorted best-first.
    fn breed(&self, ranked: &[Individual], layout: &ChromosomeLayout, rng: &mut SimRng) -> Vec<Individual> {
        let s = &self.settings;
        let mut next: Vec<Individual> = ranked[..s.elitism].to_vec();

        let pool: Vec<usize> = (0..s.num_parents).map(|_| self.tournament(ranked.len(), rng)).collect();
        while next.len() < s.population_size {
            let a = pool[rng.gen_range(0..pool.len())];
            let b = pool[rng.gen_range(0..pool.len())];
            let mut child = self.crossover(&ranked[a].genes, &ranked[b].genes, rng);
            self.mutate(&mut child, layout, rng);
            next.push(Individual::new(child));
        }
        next
    }
}

impl SearchStrategy for GeneticOptimization {
    fn name(&self) -> &'static str {
        "genetic"
    }

    fn maximize<E: Evaluate, O: SearchObserver>(
        &self,
        bounds:    &InputBounds,
        evaluator: &E,
        observer:  &mut O,
    ) -> OptimizeResult<SearchOutcome> {
        require_bounds(bounds)?;
        self.settings.validate(bounds.len())?;
        if let Some(guess) = &self.initial_guess {
            if guess.len() != bounds.len() {
                return Err(OptimizeError::Bounds(format!(
                    "initial guess has {} positions, bounds have {}",
                    guess.len(),
                    bounds.len()
                )));
            }
        }

        let layout = ChromosomeLayout::new(bounds, self.settings.chromosome_size)?;
        let mut rng = SimRng::new(self.settings.seed);
        let mut population = self.initial_population(&layout, &mut rng);

        let mut best_genes = population[0].genes.clone();
        let mut best = Fitness::WORST;
        let mut evaluations = 0;

        for generation in 0..self.settings.generation_limit {
            // ① Evaluate.
            let pending: Vec<usize> = (0..population.len()).filter(|&i| population[i].fitness.is_none()).collect();
            let schedules: Vec<Vec<f64>> = pending.iter().map(|&i| layout.decode(&population[i].genes)).collect();
            let scores = evaluate_batch(evaluator, &schedules)?;
            evaluations += scores.len();
            for ((&i, schedule), &fitness) in pending.iter().zip(&schedules).zip(&scores) {
                population[i].fitness = Some(fitness);
                observer.on_evaluation(schedule, fitness);
            }

            // ② Rank.
            population.sort_by(|a, b| b.score().cmp(&a.score()));
            let leader = population[0].score();
            if leader > best {
                best = leader;
                best_genes = population[0].genes.clone();
            }

            let fitness: Vec<Fitness> = population.iter().map(Individual::score).collect();
            let stats = GenerationStats::from_fitness(generation, &fitness, best);
            if stats.feasible == 0 {
                warn!(generation, best = %stats.best, "every schedule in this generation drains the battery");
            }
            debug!(generation, best = %stats.best, feasible = stats.feasible, "generation ranked");
            observer.on_generation(&stats);

            // ③–⑤ Breed, except after the final generation.
            if generation + 1 < self.settings.generation_limit {
                population = self.breed(&population, &layout, &mut rng);
            }
        }

        let outcome = SearchOutcome {
            best: layout.decode(&best_genes),
            fitness: best,
            evaluations,
            generations: self.settings.generation_limit,
        };
        observer.on_search_end(&outcome);
        Ok(outcome)
    }
}
