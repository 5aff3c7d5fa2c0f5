//! race: solar race simulator and speed-schedule optimizer.
//!
//! ```text
//! race --race-type ASC run --optimizer genetic --save-speeds speeds_ASC.csv
//! race --race-type FSGP --granularity 2 export -s speeds_FSGP.csv --values default,motor_consumed_energy
//! race health-check
//! ```

mod cli;
#[cfg(test)]
mod tests;

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use sr_core::{Fitness, Granularity, RaceType};
use sr_optimize::{
    BayesianOptimization, GenerationStats, GeneticOptimization, OptimizationSettings, ProgressLog,
    RaceObjective, RandomOptimization, SearchObserver, SearchOutcome, SearchStrategy,
};
use sr_output::{CsvWriter, OutputWriter, SearchOutputObserver, write_speeds_csv};
use sr_sim::{RaceSimulation, ReturnType, RunOutput, load_race_documents, load_speeds_csv};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use cli::{Cli, Command, ExportArgs, OptimizerArg, RunArgs, ScheduleArgs};

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with(fmt::layer())
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let race: RaceType = cli.race_type.into();
    let docs = load_race_documents(&cli.config_dir, race)
        .with_context(|| format!("loading {race} configuration from {}", cli.config_dir.display()))?;
    let sim = docs.build_simulation(Granularity(cli.granularity))?;

    match cli.command {
        Command::Run(args) => run(&sim, race, &args),
        Command::Export(args) => export(&sim, &args),
        Command::HealthCheck => health_check(&sim, race),
    }
}

// ── Subcommands ───────────────────────────────────────────────────────────────

fn run(sim: &RaceSimulation, race: RaceType, args: &RunArgs) -> Result<()> {
    let initial = initial_schedule(sim, &args.schedule)?;
    let objective = RaceObjective::for_race(sim);

    println!("=== race: {race} ===");
    print_run("initial schedule", sim.run(&initial, ReturnType::DistanceAndTime)?);
    let initial_fitness = sim.fitness(&initial, objective.objective())?;
    println!("  fitness: {initial_fitness}");

    if args.optimizer == OptimizerArg::None {
        return Ok(());
    }

    let bounds = objective.bounds()?;
    let mut reporter = Reporter::new(args.output_dir.as_deref())?;
    let seed = args.seed.unwrap_or(0);
    let started = Instant::now();

    let outcome = match args.optimizer {
        OptimizerArg::None => return Ok(()),
        OptimizerArg::Genetic => GeneticOptimization::new(genetic_settings(args, bounds.len())?)
            .with_initial_guess(clamped(&bounds, &initial))
            .maximize(&bounds, &objective, &mut reporter)?,
        OptimizerArg::Random => {
            RandomOptimization::new(args.iterations, seed).maximize(&bounds, &objective, &mut reporter)?
        }
        OptimizerArg::Bayesian => {
            BayesianOptimization::new(args.iterations, seed).maximize(&bounds, &objective, &mut reporter)?
        }
    };
    if let Some(e) = reporter.take_error() {
        warn!("search output error: {e}");
    }

    println!();
    println!("Search finished in {:.2} s ({} evaluations)", started.elapsed().as_secs_f64(), outcome.evaluations);
    print_run("optimized schedule", sim.run(&outcome.best, ReturnType::DistanceAndTime)?);
    println!("  fitness: {}", outcome.fitness);

    let best = if outcome.fitness >= initial_fitness {
        outcome.best
    } else {
        info!("search did not beat the initial schedule; keeping it");
        initial
    };
    println!("  speeds (km/h): {}", format_speeds(&best));

    if let Some(name) = &args.save_speeds {
        let path = args.schedule.speeds_dir.join(name);
        write_speeds_csv(&path, &best).with_context(|| format!("writing {}", path.display()))?;
        println!("Saved schedule to {}", path.display());
    }
    Ok(())
}

fn export(sim: &RaceSimulation, args: &ExportArgs) -> Result<()> {
    let speeds = initial_schedule(sim, &args.schedule)?;
    let run = sim.run_model(&speeds)?;
    let results = run.get_results(args.values.as_slice())?;

    std::fs::create_dir_all(&args.output_dir)
        .with_context(|| format!("creating {}", args.output_dir.display()))?;
    let mut writer = CsvWriter::new(&args.output_dir)?;
    writer.write_series(&results)?;
    writer.finish()?;

    println!(
        "Exported {} result(s) over {} ticks to {}",
        results.len(),
        run.tick_count(),
        args.output_dir.display()
    );
    Ok(())
}

fn health_check(sim: &RaceSimulation, race: RaceType) -> Result<()> {
    let (lo, hi) = sim.speed_bounds();
    let run = sim.run_model(&sim.constant_schedule(0.5 * (lo + hi)))?;
    println!(
        "ok: {race}, {} driving divisions, {} ticks, final SOC {:.3}",
        sim.get_driving_time_divisions(),
        run.tick_count(),
        run.final_soc()
    );
    Ok(())
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn initial_schedule(sim: &RaceSimulation, args: &ScheduleArgs) -> Result<Vec<f64>> {
    match &args.speeds {
        Some(name) => {
            let path = args.speeds_dir.join(name);
            load_speeds_csv(&path, sim.get_driving_time_divisions())
                .with_context(|| format!("loading cached speeds {}", path.display()))
        }
        None => Ok(sim.constant_schedule(args.initial_speed)),
    }
}

/// Settings from `--settings`, or defaults sized to the schedule; `--seed`
/// wins over the file.
fn genetic_settings(args: &RunArgs, schedule_len: usize) -> Result<OptimizationSettings> {
    let mut settings = match &args.settings {
        Some(path) => {
            let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
            serde_json::from_str::<OptimizationSettings>(&text)
                .with_context(|| format!("parsing {}", path.display()))?
        }
        None => OptimizationSettings::for_schedule(schedule_len),
    };
    if let Some(seed) = args.seed {
        settings.seed = seed;
    }
    Ok(settings)
}

fn clamped(bounds: &sr_optimize::InputBounds, schedule: &[f64]) -> Vec<f64> {
    let mut s = schedule.to_vec();
    bounds.clamp(&mut s);
    s
}

fn print_run(label: &str, output: RunOutput) {
    if let RunOutput::DistanceAndTime { km, hours } = output {
        println!("{label}: {km:.2} km in {hours:.2} h");
    }
}

fn format_speeds(speeds: &[f64]) -> String {
    speeds.iter().map(|v| format!("{v:.1}")).collect::<Vec<_>>().join(" ")
}

/// Progress log plus an optional `generations.csv`.
struct Reporter {
    log: ProgressLog,
    csv: Option<SearchOutputObserver<CsvWriter>>,
}

impl Reporter {
    fn new(output_dir: Option<&Path>) -> Result<Self> {
        let csv = match output_dir {
            Some(dir) => {
                std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
                Some(SearchOutputObserver::new(CsvWriter::new(dir)?))
            }
            None => None,
        };
        Ok(Self { log: ProgressLog::default(), csv })
    }

    fn take_error(&mut self) -> Option<sr_output::OutputError> {
        self.csv.as_mut().and_then(|c| c.take_error())
    }
}

impl SearchObserver for Reporter {
    fn on_evaluation(&mut self, _schedule: &[f64], fitness: Fitness) {
        tracing::trace!(fitness = %fitness, "evaluated");
    }

    fn on_generation(&mut self, stats: &GenerationStats) {
        self.log.on_generation(stats);
        if let Some(csv) = &mut self.csv {
            csv.on_generation(stats);
        }
    }

    fn on_search_end(&mut self, outcome: &SearchOutcome) {
        self.log.on_search_end(outcome);
        if let Some(csv) = &mut self.csv {
            csv.on_search_end(outcome);
        }
    }
}
