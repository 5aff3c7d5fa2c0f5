//! `sr-sim`: simulation orchestrator for the solar race simulator.
//!
//! # One run
//!
//! ```text
//! speed schedule (one entry per driving division)
//!   ① Expand:     divisions → ticks; 0 km/h outside the driving window
//!                  and after the finish line.
//!   ② Route:      per-tick distance, position, elevation, grade.
//!   ③ Sun:        cloud cover + irradiance (driving vs. parked array).
//!   ④ Energy:     motor + LVS draw, array harvest → cumulative net trace.
//!   ⑤ Battery:    fresh BasicBattery maps the trace to SOC/V/Wh and raw SOC.
//!   ⑥ Reduce:     first raw SOC < 0 ends the race; distance, time, fitness.
//! ```
//!
//! [`Simulation::run_model`] is a pure function of the schedule and the
//! immutable [`SimulationConfig`], so optimizers may call it concurrently.
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use sr_core::Granularity;
//! use sr_sim::{load_race_documents, ReturnType};
//!
//! let docs = load_race_documents(Path::new("config"), RaceType::Asc)?;
//! let sim = docs.build_simulation(Granularity(1))?;
//! let out = sim.run(&sim.constant_schedule(45.0), ReturnType::DistanceAndTime)?;
//! ```

pub mod builder;
pub mod config;
pub mod error;
pub mod results;
pub mod run;
pub mod sim;
pub mod speeds;


pub use builder::SimulationBuilder;
pub use config::{InitialConditions, ModelParameters, RaceDocuments, RaceSimulation, load_race_documents};
pub use error::{SimError, SimResult};
pub use results::{DEFAULT_KEYS, ResultKey, ResultValue};
pub use run::{Objective, RaceRun, ReturnType, RunOutput};
pub use sim::{Simulation, SimulationConfig};
pub use speeds::{load_speeds_csv, load_speeds_reader};
