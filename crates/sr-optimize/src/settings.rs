//! Genetic-search hyperparameters.

use std::str::FromStr;

use crate::{OptimizeError, OptimizeResult};

/// How two parents are recombined.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Crossover {
    /// Head of one parent, tail of the other, cut at a random gene.
    #[default]
    SinglePoint,
    /// Each gene from either parent with equal probability.
    Uniform,
}

impl FromStr for Crossover {
    type Err = OptimizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "single_point" => Ok(Crossover::SinglePoint),
            "uniform"      => Ok(Crossover::Uniform),
            other => Err(OptimizeError::Settings(format!("unknown crossover {other:?}"))),
        }
    }
}

/// Hyperparameters of [`GeneticOptimization`][crate::GeneticOptimization].
///
/// | Field              | Meaning                                                  |
/// |--------------------|----------------------------------------------------------|
/// | `chromosome_size`  | genes per individual, stretched over the schedule        |
/// | `generation_limit` | generations evaluated (the last one is not bred)         |
/// | `population_size`  | individuals per generation                               |
/// | `num_parents`      | tournament winners in each mating pool                   |
/// | `k_tournament`     | individuals drawn per tournament                         |
/// | `elitism`          | top individuals copied unchanged to the next generation  |
/// | `mutation_percent` | share of genes mutated per offspring (0–100)             |
/// | `max_mutation`     | largest shift as a fraction of the gene's range          |
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OptimizationSettings {
    pub chromosome_size:  usize,
    pub generation_limit: usize,
    pub population_size:  usize,
    pub num_parents:      usize,
    pub k_tournament:     usize,
    pub elitism:          usize,
    pub mutation_percent: f64,
    pub max_mutation:     f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub crossover:        Crossover,
    #[cfg_attr(feature = "serde", serde(default))]
    pub seed:             u64,
}

impl OptimizationSettings {
    /// Reasonable defaults for a schedule of `schedule_len` positions.
    pub fn for_schedule(schedule_len: usize) -> Self {
        Self {
            chromosome_size:  schedule_len.clamp(1, 48),
            generation_limit: 40,
            population_size:  24,
            num_parents:      12,
            k_tournament:     5,
            elitism:          8,
            mutation_percent: 10.0,
            max_mutation:     0.1,
            crossover:        Crossover::SinglePoint,
            seed:             0,
        }
    }

    pub fn validate(&self, schedule_len: usize) -> OptimizeResult<()> {
        let fail = |msg: String| Err(OptimizeError::Settings(msg));

        if self.population_size == 0 {
            return fail("population_size must be at least 1".into());
        }
        if self.generation_limit == 0 {
            return fail("generation_limit must be at least 1".into());
        }
        if self.chromosome_size == 0 || self.chromosome_size > schedule_len {
            return fail(format!(
                "chromosome_size {} must be in 1..={schedule_len}",
                self.chromosome_size
            ));
        }
        if self.k_tournament == 0 || self.k_tournament > self.population_size {
            return fail(format!(
                "k_tournament {} must be in 1..={}",
                self.k_tournament, self.population_size
            ));
        }
        if self.num_parents == 0 || self.num_parents > self.population_size {
            return fail(format!(
                "num_parents {} must be in 1..={}",
                self.num_parents, self.population_size
            ));
        }
        if self.elitism > self.population_size {
            return fail(format!(
                "elitism {} exceeds population_size {}",
                self.elitism, self.population_size
            ));
        }
        // Full elitism breeds nothing, so the parent count is irrelevant.
        if self.elitism != self.population_size && self.elitism >= self.num_parents {
            return fail(format!(
                "elitism {} must be below num_parents {}",
                self.elitism, self.num_parents
            ));
        }
        if !(0.0..=100.0).contains(&self.mutation_percent) {
            return fail(format!("mutation_percent {} is outside [0, 100]", self.mutation_percent));
        }
        if !(self.max_mutation > 0.0 && self.max_mutation <= 1.0) {
            return fail(format!("max_mutation {} is outside (0, 1]", self.max_mutation));
        }
        Ok(())
    }

    /// Genes changed per offspring; zero only when `mutation_percent` is 0.
    pub fn mutated_genes(&self) -> usize {
        if self.mutation_percent <= 0.0 {
            return 0;
        }
        let n = (self.mutation_percent / 100.0 * self.chromosome_size as f64).round() as usize;
        n.clamp(1, self.chromosome_size)
    }
}
