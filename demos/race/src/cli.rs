//! Command-line surface.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use sr_core::RaceType;

#[derive(Parser)]
#[command(author, version, about, propagate_version = true)]
pub struct Cli {
    /// Which race to simulate.
    #[arg(long = "race-type", value_enum, ignore_case = true, default_value = "ASC", global = true)]
    pub race_type: RaceArg,

    /// Speed-schedule divisions per hour (must divide 3600).
    #[arg(long, default_value_t = 1, global = true)]
    pub granularity: u32,

    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Directory holding initial_conditions_<RACE>.json and settings_<RACE>.json.
    #[arg(long = "config-dir", default_value = "config", global = true)]
    pub config_dir: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Copy, Clone, PartialEq, Eq, Debug, ValueEnum)]
pub enum RaceArg {
    #[value(name = "ASC")]
    Asc,
    #[value(name = "FSGP")]
    Fsgp,
}

impl From<RaceArg> for RaceType {
    fn from(arg: RaceArg) -> Self {
        match arg {
            RaceArg::Asc => RaceType::Asc,
            RaceArg::Fsgp => RaceType::Fsgp,
        }
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// Simulate a schedule, then search for a better one.
    Run(RunArgs),

    /// Simulate a schedule and write the requested result series to CSV.
    Export(ExportArgs),

    /// Load the configuration, build the model, and run one constant schedule.
    #[command(name = "health-check")]
    HealthCheck,
}

#[derive(Args)]
pub struct ScheduleArgs {
    /// Cached speed schedule (file name inside --speeds-dir).
    #[arg(short, long)]
    pub speeds: Option<String>,

    #[arg(long = "speeds-dir", default_value = "speeds")]
    pub speeds_dir: PathBuf,

    /// Constant speed (km/h) used when no cached schedule is given.
    #[arg(long = "initial-speed", default_value_t = 40.0)]
    pub initial_speed: f64,
}

#[derive(Copy, Clone, PartialEq, Eq, Debug, ValueEnum)]
pub enum OptimizerArg {
    Genetic,
    Random,
    Bayesian,
    None,
}

#[derive(Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub schedule: ScheduleArgs,

    #[arg(long, value_enum, default_value = "genetic")]
    pub optimizer: OptimizerArg,

    /// JSON file with genetic-search settings; defaults are sized to the schedule.
    #[arg(long)]
    pub settings: Option<PathBuf>,

    /// Draws (random) or surrogate steps (bayesian).
    #[arg(long, default_value_t = 5)]
    pub iterations: usize,

    /// Search seed; overrides the `seed` in --settings.  Defaults to 0.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Write generations.csv here.
    #[arg(long = "output-dir")]
    pub output_dir: Option<PathBuf>,

    /// Store the best schedule in --speeds-dir as this file name.
    #[arg(long = "save-speeds")]
    pub save_speeds: Option<String>,
}

#[derive(Args)]
pub struct ExportArgs {
    #[command(flatten)]
    pub schedule: ScheduleArgs,

    /// Result names, comma-separated; "default" expands to the standard set.
    #[arg(long, value_delimiter = ',', default_value = "default")]
    pub values: Vec<String>,

    #[arg(long = "output-dir", default_value = "output")]
    pub output_dir: PathBuf,
}
