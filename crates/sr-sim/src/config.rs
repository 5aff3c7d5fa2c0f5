//! JSON configuration documents.
//!
//! A race is described by two documents in a config directory supplied by
//! the caller:
//!
//! | File                               | Type                  |
//! |------------------------------------|-----------------------|
//! | `initial_conditions_<RACE>.json`   | [`InitialConditions`] |
//! | `settings_<RACE>.json`             | [`ModelParameters`]   |
//!
//! `<RACE>` is `ASC` or `FSGP`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sr_car::VehicleConstants;
use sr_core::{GeoPoint, Granularity, RaceClock, RaceType};
use sr_environment::{HourlyCloudCover, WaypointRoute};
use tracing::info;

use crate::sim::{Simulation, SimulationConfig};
use crate::{SimError, SimResult};

fn default_start_day() -> u32 {
    // Early July, when both races usually run.
    186
}

fn default_max_speed() -> f64 {
    90.0
}

/// Where the car is and what state it is in when the simulation starts.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InitialConditions {
    pub current_coord:          GeoPoint,
    /// Local clock hour at the first tick.
    pub start_hour:             u32,
    /// Initial battery state-of-charge in `[0, 1]`.
    pub initial_battery_charge: f64,
    /// Ask the route collaborator to refresh its cache.
    #[serde(default)]
    pub gis_force_update:       bool,
    /// Ask the weather collaborator to refresh its cache.
    #[serde(default)]
    pub weather_force_update:   bool,
    #[serde(default = "default_start_day")]
    pub start_day_of_year:      u32,
}

/// Route, timing, and vehicle parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ModelParameters {
    pub origin_coord:        GeoPoint,
    pub dest_coord:          GeoPoint,
    #[serde(default)]
    pub waypoints:           Vec<GeoPoint>,
    /// One elevation (m) per route vertex: origin, waypoints, destination.
    #[serde(default)]
    pub elevations:          Option<Vec<f64>>,
    /// Constant low-voltage-system draw (W).
    pub lvs_power_loss:      f64,
    /// Seconds per tick.
    pub tick:                u32,
    /// Total simulated seconds.
    pub simulation_duration: u64,
    /// Standard-time UTC offset of the route, in hours.
    pub utc_offset_hours:    f64,
    #[serde(default)]
    pub min_speed_kmh:       f64,
    #[serde(default = "default_max_speed")]
    pub max_speed_kmh:       f64,
    /// Hour-by-hour cloud cover (%) from the first tick; empty = clear sky.
    #[serde(default)]
    pub hourly_cloud_cover:  Vec<f64>,
    #[serde(default)]
    pub penalize_overcharge: bool,
    #[serde(default)]
    pub vehicle:             VehicleConstants,
}

/// The simulation assembled from JSON documents.
pub type RaceSimulation = Simulation<WaypointRoute, HourlyCloudCover>;

/// Both documents for one race.
#[derive(Clone, Debug, PartialEq)]
pub struct RaceDocuments {
    pub race_type:          RaceType,
    pub initial_conditions: InitialConditions,
    pub model_parameters:   ModelParameters,
}

pub fn initial_conditions_path(dir: &Path, race: RaceType) -> PathBuf {
    dir.join(format!("initial_conditions_{race}.json"))
}

pub fn settings_path(dir: &Path, race: RaceType) -> PathBuf {
    dir.join(format!("settings_{race}.json"))
}

/// Read both documents for `race` from `dir`.
pub fn load_race_documents(dir: &Path, race: RaceType) -> SimResult<RaceDocuments> {
    let initial_conditions: InitialConditions = read_json(&initial_conditions_path(dir, race))?;
    let model_parameters: ModelParameters = read_json(&settings_path(dir, race))?;

    info!(
        race                 = %race,
        gis_force_update     = initial_conditions.gis_force_update,
        weather_force_update = initial_conditions.weather_force_update,
        "loaded race configuration"
    );

    Ok(RaceDocuments { race_type: race, initial_conditions, model_parameters })
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> SimResult<T> {
    let text = std::fs::read_to_string(path).map_err(|source| SimError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| SimError::Json { path: path.to_path_buf(), source })
}

impl RaceDocuments {
    /// Assemble the immutable scenario at `granularity`.
    pub fn simulation_config(&self, granularity: Granularity) -> SimResult<SimulationConfig> {
        let ic = &self.initial_conditions;
        let mp = &self.model_parameters;
        Ok(SimulationConfig {
            race_type:           self.race_type,
            granularity,
            clock:               RaceClock::new(ic.start_day_of_year, ic.start_hour, mp.tick)?,
            duration_secs:       mp.simulation_duration,
            initial_soc:         ic.initial_battery_charge,
            lvs_power_loss:      mp.lvs_power_loss,
            vehicle:             mp.vehicle,
            min_speed_kmh:       mp.min_speed_kmh,
            max_speed_kmh:       mp.max_speed_kmh,
            penalize_overcharge: mp.penalize_overcharge,
        })
    }

    /// The route from the car's current position to the destination.
    ///
    /// Vertices up to and including the one nearest `current_coord` are
    /// dropped and replaced by `current_coord` itself.  Track races loop.
    pub fn route(&self) -> SimResult<WaypointRoute> {
        let mp = &self.model_parameters;
        let current = self.initial_conditions.current_coord;

        let mut leading: Vec<GeoPoint> = Vec::with_capacity(mp.waypoints.len() + 1);
        leading.push(mp.origin_coord);
        leading.extend_from_slice(&mp.waypoints);

        let nearest = leading
            .iter()
            .enumerate()
            .map(|(i, p)| (i, p.distance_m(current)))
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map_or(0, |(i, _)| i);

        let waypoints = &leading[nearest + 1..];
        let elevations = match &mp.elevations {
            Some(e) if e.len() == leading.len() + 1 => Some(e[nearest..].to_vec()),
            Some(e) => {
                return Err(SimError::Config(format!(
                    "{} elevations for {} route vertices",
                    e.len(),
                    leading.len() + 1
                )));
            }
            None => None,
        };

        Ok(WaypointRoute::new(
            current,
            waypoints,
            mp.dest_coord,
            elevations,
            mp.utc_offset_hours,
            self.race_type.is_looped(),
        )?)
    }

    pub fn weather(&self) -> HourlyCloudCover {
        HourlyCloudCover::new(self.model_parameters.hourly_cloud_cover.clone())
    }

    /// Everything above, validated into a runnable [`Simulation`].
    pub fn build_simulation(&self, granularity: Granularity) -> SimResult<RaceSimulation> {
        Simulation::new(self.simulation_config(granularity)?, self.route()?, self.weather())
    }
}
