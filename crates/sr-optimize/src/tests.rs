//! Unit tests for sr-optimize.

#[cfg(test)]
mod helpers {
    use sr_core::Fitness;

    use crate::{GenerationStats, OptimizationSettings, SearchObserver, SearchOutcome};

    #[derive(Default)]
    pub struct Recorder {
        pub evaluated:   Vec<(Vec<f64>, Fitness)>,
        pub generations: Vec<GenerationStats>,
        pub ended:       Option<SearchOutcome>,
    }

    impl SearchObserver for Recorder {
        fn on_evaluation(&mut self, schedule: &[f64], fitness: Fitness) {
            self.evaluated.push((schedule.to_vec(), fitness));
        }

        fn on_generation(&mut self, stats: &GenerationStats) {
            self.generations.push(stats.clone());
        }

        fn on_search_end(&mut self, outcome: &SearchOutcome) {
            self.ended = Some(outcome.clone());
        }
    }

    /// Small, valid settings for quick searches.
    pub fn small(schedule_len: usize, seed: u64) -> OptimizationSettings {
        OptimizationSettings {
            chromosome_size:  schedule_len,
            generation_limit: 6,
            population_size:  10,
            num_parents:      5,
            k_tournament:     3,
            elitism:          2,
            mutation_percent: 30.0,
            max_mutation:     0.5,
            seed,
            ..OptimizationSettings::for_schedule(schedule_len)
        }
    }
}

#[cfg(test)]
mod settings {
    use crate::{OptimizationSettings, OptimizeError};

    #[test]
    fn defaults_are_valid() {
        for len in [1, 9, 18, 72] {
            OptimizationSettings::for_schedule(len).validate(len).unwrap();
        }
    }

    #[test]
    fn elitism_must_stay_below_parent_count() {
        let mut s = OptimizationSettings::for_schedule(9);
        s.elitism = s.num_parents;
        assert!(matches!(s.validate(9), Err(OptimizeError::Settings(_))));

        // Full elitism is the one exception.
        s.elitism = s.population_size;
        s.validate(9).unwrap();
    }

    #[test]
    fn rejects_malformed_values() {
        let base = OptimizationSettings::for_schedule(9);
        let cases = [
            OptimizationSettings { k_tournament: base.population_size + 1, ..base.clone() },
            OptimizationSettings { k_tournament: 0, ..base.clone() },
            OptimizationSettings { num_parents: base.population_size + 1, ..base.clone() },
            OptimizationSettings { chromosome_size: 10, ..base.clone() },
            OptimizationSettings { chromosome_size: 0, ..base.clone() },
            OptimizationSettings { generation_limit: 0, ..base.clone() },
            OptimizationSettings { max_mutation: 0.0, ..base.clone() },
            OptimizationSettings { max_mutation: 1.5, ..base.clone() },
            OptimizationSettings { mutation_percent: 150.0, ..base.clone() },
            OptimizationSettings { elitism: base.population_size + 1, ..base.clone() },
        ];
        for case in cases {
            assert!(case.validate(9).is_err(), "{case:?}");
        }
    }

    #[test]
    fn mutated_gene_count() {
        let mut s = OptimizationSettings::for_schedule(48);
        s.mutation_percent = 10.0;
        assert_eq!(s.mutated_genes(), 5);
        s.mutation_percent = 1.0;
        assert_eq!(s.mutated_genes(), 1);
        s.mutation_percent = 100.0;
        assert_eq!(s.mutated_genes(), 48);
        s.mutation_percent = 0.0;
        assert_eq!(s.mutated_genes(), 0);
    }

    #[test]
    fn crossover_names() {
        assert_eq!("uniform".parse::<crate::Crossover>().unwrap(), crate::Crossover::Uniform);
        assert!("two_point".parse::<crate::Crossover>().is_err());
    }
}

#[cfg(test)]
mod bounds {
    use sr_core::SimRng;

    use crate::InputBounds;

    #[test]
    fn rejects_inverted_interval() {
        assert!(InputBounds::new().add_bounds(3, 50.0, 10.0).is_err());
        assert!(InputBounds::new().add_bounds(3, 0.0, f64::NAN).is_err());
    }

    #[test]
    fn clamp_and_contains() {
        let b = InputBounds::new().add_bounds(2, 0.0, 90.0).unwrap().add_bounds(1, 20.0, 60.0).unwrap();
        assert_eq!(b.len(), 3);
        let mut x = vec![-5.0, 120.0, 10.0];
        assert!(!b.contains(&x));
        b.clamp(&mut x);
        assert_eq!(x, [0.0, 90.0, 20.0]);
        assert!(b.contains(&x));
        assert!(!b.contains(&x[..2]));
    }

    #[test]
    fn samples_stay_inside() {
        let b = InputBounds::new().add_bounds(5, 10.0, 80.0).unwrap().add_bounds(2, 40.0, 40.0).unwrap();
        let mut rng = SimRng::new(9);
        for _ in 0..200 {
            let s = b.sample(&mut rng);
            assert!(b.contains(&s));
            assert_eq!(s[6], 40.0);
        }
    }
}

#[cfg(test)]
mod layout {
    use approx::assert_relative_eq;

    use crate::InputBounds;
    use crate::genetic::ChromosomeLayout;

    fn two_zone() -> InputBounds {
        InputBounds::new().add_bounds(3, 0.0, 90.0).unwrap().add_bounds(3, 20.0, 60.0).unwrap()
    }

    #[test]
    fn genes_stretch_over_schedule() {
        let layout = ChromosomeLayout::new(&two_zone(), 3).unwrap();
        assert_eq!(layout.decode(&[10.0, 30.0, 50.0]), [10.0, 10.0, 30.0, 30.0, 50.0, 50.0]);
    }

    #[test]
    fn gene_bounds_intersect_covered_positions() {
        let layout = ChromosomeLayout::new(&two_zone(), 3).unwrap();
        let mut genes = vec![95.0, 5.0, 70.0];
        layout.clamp(&mut genes);
        // Gene 1 covers positions 2 (0–90) and 3 (20–60).
        assert_eq!(genes, [90.0, 20.0, 60.0]);
    }

    #[test]
    fn encode_averages_positions() {
        let layout = ChromosomeLayout::new(&two_zone(), 3).unwrap();
        let genes = layout.encode(&[10.0, 20.0, 30.0, 40.0, 50.0, 60.0]);
        assert_relative_eq!(genes[0], 15.0);
        assert_relative_eq!(genes[1], 35.0);
        assert_relative_eq!(genes[2], 55.0);
    }

    #[test]
    fn disjoint_positions_cannot_share_a_gene() {
        let b = InputBounds::new().add_bounds(1, 0.0, 10.0).unwrap().add_bounds(1, 20.0, 30.0).unwrap();
        assert!(ChromosomeLayout::new(&b, 1).is_err());
        assert!(ChromosomeLayout::new(&b, 2).is_ok());
    }
}

#[cfg(test)]
mod genetic {
    use proptest::prelude::*;
    use sr_core::Fitness;

    use super::helpers::{Recorder, small};
    use crate::{
        GeneticOptimization, InputBounds, NoopObserver, OptimizeError, OptimizeResult, SearchStrategy,
    };

    /// Rewards going fast, but schedules averaging above 60 "drain".
    fn budgeted(s: &[f64]) -> OptimizeResult<Fitness> {
        let mean = s.iter().sum::<f64>() / s.len() as f64;
        Ok(if mean > 60.0 { Fitness::Infeasible { deficit_wh: mean - 60.0 } } else { Fitness::Feasible(mean) })
    }

    #[test]
    fn single_generation_full_elitism_returns_best_initial() {
        let bounds = InputBounds::uniform(8, 0.0, 90.0).unwrap();
        let mut settings = small(8, 3);
        settings.generation_limit = 1;
        settings.elitism = settings.population_size;

        let mut rec = Recorder::default();
        let out = GeneticOptimization::new(settings.clone()).maximize(&bounds, &budgeted, &mut rec).unwrap();

        assert_eq!(out.evaluations, settings.population_size);
        assert_eq!(rec.evaluated.len(), settings.population_size);
        let (best_schedule, best_fitness) = rec.evaluated.iter().max_by(|a, b| a.1.cmp(&b.1)).unwrap();
        assert_eq!(out.fitness, *best_fitness);
        assert_eq!(&out.best, best_schedule);
        assert_eq!(rec.ended.as_ref(), Some(&out));
    }

    #[test]
    fn best_so_far_never_regresses() {
        let bounds = InputBounds::uniform(12, 0.0, 90.0).unwrap();
        let mut rec = Recorder::default();
        let out = GeneticOptimization::new(small(12, 11)).maximize(&bounds, &budgeted, &mut rec).unwrap();

        assert_eq!(rec.generations.len(), 6);
        for w in rec.generations.windows(2) {
            assert!(w[1].best_so_far >= w[0].best_so_far);
        }
        let best_evaluated = rec.evaluated.iter().map(|e| e.1).max().unwrap();
        assert_eq!(out.fitness, best_evaluated);
        assert_eq!(rec.generations.last().unwrap().best_so_far, out.fitness);
    }

    #[test]
    fn elites_are_not_re_evaluated() {
        let bounds = InputBounds::uniform(6, 0.0, 90.0).unwrap();
        let settings = small(6, 5);
        let out = GeneticOptimization::new(settings.clone()).maximize(&bounds, &budgeted, &mut NoopObserver).unwrap();
        let per_later_generation = settings.population_size - settings.elitism;
        assert_eq!(
            out.evaluations,
            settings.population_size + (settings.generation_limit - 1) * per_later_generation
        );
    }

    #[test]
    fn feasible_beats_infeasible() {
        let bounds = InputBounds::uniform(10, 0.0, 90.0).unwrap();
        let out = GeneticOptimization::new(small(10, 21))
            .with_initial_guess(vec![30.0; 10])
            .maximize(&bounds, &budgeted, &mut NoopObserver)
            .unwrap();
        assert!(out.fitness.is_feasible());
        assert!(out.fitness >= Fitness::Feasible(30.0));
    }

    #[test]
    fn same_seed_same_result() {
        let bounds = InputBounds::uniform(9, 0.0, 90.0).unwrap();
        let a = GeneticOptimization::new(small(9, 77)).maximize(&bounds, &budgeted, &mut NoopObserver).unwrap();
        let b = GeneticOptimization::new(small(9, 77)).maximize(&bounds, &budgeted, &mut NoopObserver).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn coarse_chromosome_gives_piecewise_schedule() {
        let bounds = InputBounds::uniform(9, 0.0, 90.0).unwrap();
        let mut settings = small(9, 4);
        settings.chromosome_size = 3;
        let out = GeneticOptimization::new(settings).maximize(&bounds, &budgeted, &mut NoopObserver).unwrap();
        assert_eq!(out.best.len(), 9);
        for block in out.best.chunks(3) {
            assert!(block.iter().all(|&v| v == block[0]));
        }
    }

    #[test]
    fn invalid_settings_fail_before_evaluating() {
        let bounds = InputBounds::uniform(4, 0.0, 90.0).unwrap();
        let mut settings = small(4, 0);
        settings.elitism = settings.num_parents;
        let mut rec = Recorder::default();
        let err = GeneticOptimization::new(settings).maximize(&bounds, &budgeted, &mut rec);
        assert!(matches!(err, Err(OptimizeError::Settings(_))));
        assert!(rec.evaluated.is_empty());
    }

    #[test]
    fn initial_guess_must_fit() {
        let bounds = InputBounds::uniform(4, 0.0, 90.0).unwrap();
        let err = GeneticOptimization::new(small(4, 0))
            .with_initial_guess(vec![10.0; 5])
            .maximize(&bounds, &budgeted, &mut NoopObserver);
        assert!(matches!(err, Err(OptimizeError::Bounds(_))));
    }

    #[test]
    fn evaluator_errors_abort() {
        let bounds = InputBounds::uniform(4, 0.0, 90.0).unwrap();
        let failing = |_: &[f64]| -> OptimizeResult<Fitness> { Err(OptimizeError::Surrogate("boom".into())) };
        assert!(GeneticOptimization::new(small(4, 0)).maximize(&bounds, &failing, &mut NoopObserver).is_err());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(24))]

        #[test]
        fn every_evaluated_schedule_is_in_bounds(
            seed in any::<u64>(),
            lo in 0.0f64..30.0,
            width in 1.0f64..60.0,
            generations in 1usize..8,
        ) {
            let bounds = InputBounds::new()
                .add_bounds(5, lo, lo + width).unwrap()
                .add_bounds(5, 0.0, 90.0).unwrap();
            let mut settings = small(10, seed);
            settings.generation_limit = generations;
            settings.max_mutation = 1.0;
            settings.mutation_percent = 100.0;

            let checked = |s: &[f64]| -> OptimizeResult<Fitness> {
                if bounds.contains(s) {
                    budgeted(s)
                } else {
                    Err(OptimizeError::Bounds(format!("{s:?}")))
                }
            };
            let mut rec = Recorder::default();
            let out = GeneticOptimization::new(settings).maximize(&bounds, &checked, &mut rec);
            prop_assert!(out.is_ok());
            prop_assert!(rec.evaluated.iter().all(|(s, _)| bounds.contains(s)));
        }
    }
}

#[cfg(test)]
mod random {
    use sr_core::Fitness;

    use super::helpers::Recorder;
    use crate::{InputBounds, OptimizeResult, RandomOptimization, SearchStrategy};

    fn distance(s: &[f64]) -> OptimizeResult<Fitness> {
        Ok(Fitness::Feasible(s.iter().sum()))
    }

    #[test]
    fn keeps_best_draw() {
        let bounds = InputBounds::uniform(5, 0.0, 90.0).unwrap();
        let mut rec = Recorder::default();
        let out = RandomOptimization::new(50, 8).maximize(&bounds, &distance, &mut rec).unwrap();
        assert_eq!(out.evaluations, 50);
        assert_eq!(rec.evaluated.len(), 50);
        assert!(rec.evaluated.iter().all(|(s, f)| bounds.contains(s) && *f <= out.fitness));
        assert!(bounds.contains(&out.best));
        assert_eq!(rec.generations.len(), 1);
    }

    #[test]
    fn zero_iterations_is_a_settings_error() {
        let bounds = InputBounds::uniform(5, 0.0, 90.0).unwrap();
        assert!(RandomOptimization::new(0, 8).maximize(&bounds, &distance, &mut crate::NoopObserver).is_err());
    }

    #[test]
    fn empty_bounds_rejected() {
        assert!(
            RandomOptimization::new(5, 8)
                .maximize(&InputBounds::new(), &distance, &mut crate::NoopObserver)
                .is_err()
        );
    }
}

#[cfg(test)]
mod bayesian {
    use sr_core::Fitness;

    use super::helpers::Recorder;
    use crate::bayesian::surrogate_targets;
    use crate::{BayesianOptimization, InputBounds, NoopObserver, OptimizeResult, SearchStrategy};

    fn bowl(s: &[f64]) -> OptimizeResult<Fitness> {
        Ok(Fitness::Feasible(-s.iter().map(|v| (v - 30.0) * (v - 30.0)).sum::<f64>()))
    }

    #[test]
    fn infeasible_targets_sit_below_feasible_ones() {
        let t = surrogate_targets(&[
            Fitness::Feasible(-5.0),
            Fitness::Infeasible { deficit_wh: 0.0 },
            Fitness::Feasible(2.0),
            Fitness::Infeasible { deficit_wh: 100.0 },
        ]);
        assert_eq!(t[0], -5.0);
        assert_eq!(t[2], 2.0);
        assert!(t[1] < -5.0);
        assert!(t[3] < t[1]);
    }

    #[test]
    fn all_infeasible_still_ordered() {
        let t = surrogate_targets(&[Fitness::Infeasible { deficit_wh: 5.0 }, Fitness::Infeasible { deficit_wh: 1.0 }]);
        assert!(t[0] < t[1]);
    }

    #[test]
    fn improves_on_its_initial_design() {
        let bounds = InputBounds::uniform(3, 0.0, 90.0).unwrap();
        let mut rec = Recorder::default();
        let out = BayesianOptimization::new(15, 2).maximize(&bounds, &bowl, &mut rec).unwrap();

        assert_eq!(out.evaluations, 18);
        assert_eq!(out.generations, 16);
        assert!(rec.evaluated.iter().all(|(s, _)| bounds.contains(s)));
        let initial_best = rec.evaluated[..3].iter().map(|e| e.1).max().unwrap();
        assert!(out.fitness >= initial_best);
        assert_eq!(out.fitness, rec.evaluated.iter().map(|e| e.1).max().unwrap());
    }

    #[test]
    fn flat_objective_does_not_break_the_surrogate() {
        let bounds = InputBounds::uniform(2, 10.0, 10.0).unwrap();
        let flat = |_: &[f64]| -> OptimizeResult<Fitness> { Ok(Fitness::Feasible(1.0)) };
        let out = BayesianOptimization::new(4, 0).maximize(&bounds, &flat, &mut NoopObserver).unwrap();
        assert_eq!(out.best, [10.0, 10.0]);
    }

    #[test]
    fn needs_an_initial_point() {
        let bounds = InputBounds::uniform(2, 0.0, 90.0).unwrap();
        let bo = BayesianOptimization::new(4, 0).with_init_points(0);
        assert!(bo.maximize(&bounds, &bowl, &mut NoopObserver).is_err());
    }
}

#[cfg(test)]
mod race {
    use sr_core::{Fitness, RaceType};
    use sr_environment::{ClearSky, FlatRoute};
    use sr_sim::{Objective, SimulationBuilder};

    use super::helpers::small;
    use crate::{Evaluate, GeneticOptimization, NoopObserver, RaceObjective, SearchStrategy};

    #[test]
    fn optimizes_a_simulated_race() {
        let route = FlatRoute::new(sr_core::GeoPoint::new(37.0, -95.0), 300.0, -6.0);
        let sim = SimulationBuilder::new(RaceType::Fsgp, route, ClearSky).build().unwrap();
        let objective = RaceObjective::for_race(&sim);
        assert_eq!(objective.objective(), Objective::MaximizeDistance);

        let bounds = objective.bounds().unwrap();
        assert_eq!(bounds.len(), 8);

        let guess = sim.constant_schedule(30.0);
        let baseline = objective.evaluate(&guess).unwrap();
        assert!(baseline.is_feasible());

        let out = GeneticOptimization::new(small(8, 1))
            .with_initial_guess(guess)
            .maximize(&bounds, &objective, &mut NoopObserver)
            .unwrap();
        assert!(bounds.contains(&out.best));
        assert!(out.fitness >= baseline);
        assert!(out.fitness > Fitness::Infeasible { deficit_wh: 0.0 });
        assert_eq!(sim.fitness(&out.best, Objective::MaximizeDistance).unwrap(), out.fitness);
    }
}
