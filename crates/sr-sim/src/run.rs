//! The outcome of one simulated race and its reductions.

use std::str::FromStr;

use sr_core::{Fitness, GeoPoint};

use crate::{SimError, SimResult};

// ── ReturnType / RunOutput ───────────────────────────────────────────────────

/// Which scalar(s) a run is reduced to.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum ReturnType {
    TimeTaken,
    DistanceTravelled,
    DistanceAndTime,
    /// Run only to populate the result series for export.
    Void,
}

impl ReturnType {
    pub fn as_str(self) -> &'static str {
        match self {
            ReturnType::TimeTaken         => "time_taken",
            ReturnType::DistanceTravelled => "distance_travelled",
            ReturnType::DistanceAndTime   => "distance_and_time",
            ReturnType::Void              => "void",
        }
    }
}

impl FromStr for ReturnType {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "time_taken"         => Ok(ReturnType::TimeTaken),
            "distance_travelled" => Ok(ReturnType::DistanceTravelled),
            "distance_and_time"  => Ok(ReturnType::DistanceAndTime),
            "void"               => Ok(ReturnType::Void),
            other => Err(SimError::Config(format!("unknown return type {other:?}"))),
        }
    }
}

/// A run reduced according to a [`ReturnType`].
#[derive(Copy, Clone, PartialEq, Debug)]
pub enum RunOutput {
    TimeTaken { hours: f64 },
    DistanceTravelled { km: f64 },
    DistanceAndTime { km: f64, hours: f64 },
    Void,
}

// ── Objective ────────────────────────────────────────────────────────────────

/// What the optimizer is asked to improve.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum Objective {
    /// Reach the finish as early as possible (finite routes only).
    MinimizeTime,
    /// Cover as much distance as possible in the simulated period.
    MaximizeDistance,
}

impl Objective {
    /// Road races are timed; track races are scored on distance.
    pub fn default_for(race: sr_core::RaceType) -> Self {
        if race.is_looped() { Objective::MaximizeDistance } else { Objective::MinimizeTime }
    }
}

// ── RaceRun ──────────────────────────────────────────────────────────────────

/// Every per-tick series and summary of one simulated race.
///
/// Energies are joules per tick (`cumulative_energy` is the running sum of
/// `delta_energy`); `stored_energy` is watt-hours.  Series always span the
/// whole simulated period, even after the race ended early.  Motion series
/// (`speed_kmh`, `distances`, `cumulative_distance`) stop at the finish or
/// at the draining tick; energy and environment series follow the schedule
/// as planned.
#[derive(Clone, Debug)]
pub struct RaceRun {
    pub tick_secs:             f64,
    pub duration_secs:         f64,
    pub route_length_m:        Option<f64>,

    pub speed_kmh:             Vec<f64>,
    /// Metres covered during each tick.
    pub distances:             Vec<f64>,
    pub cumulative_distance:   Vec<f64>,
    /// Moving inside the driving window (driving-irradiance model applies).
    pub driving:               Vec<bool>,
    pub coords:                Vec<GeoPoint>,
    pub elevations:            Vec<f64>,
    pub gradients:             Vec<f64>,
    pub cloud_cover:           Vec<f64>,
    pub solar_irradiance:      Vec<f64>,

    pub motor_consumed_energy: Vec<f64>,
    pub lvs_consumed_energy:   Vec<f64>,
    pub array_produced_energy: Vec<f64>,
    pub delta_energy:          Vec<f64>,
    pub cumulative_energy:     Vec<f64>,

    pub state_of_charge:       Vec<f64>,
    pub voltage:               Vec<f64>,
    pub stored_energy:         Vec<f64>,
    pub raw_soc:               Vec<f64>,

    /// First tick, up to and including the finish, whose raw
    /// state-of-charge is below zero.
    pub drained_at:            Option<usize>,
    /// Tick during which the finish line was crossed (before any drain).
    pub finished_at:           Option<usize>,
    pub distance_travelled_m:  f64,
    /// Largest raw shortfall below an empty pack up to the finish (Wh, ≥ 0).
    pub deficit_wh:            f64,
    /// Largest raw excess above a full pack up to the finish (Wh, ≥ 0).
    pub overcharge_wh:         f64,
}

impl RaceRun {
    #[inline]
    pub fn tick_count(&self) -> usize {
        self.speed_kmh.len()
    }

    #[inline]
    pub fn drained(&self) -> bool {
        self.drained_at.is_some()
    }

    #[inline]
    pub fn finished(&self) -> bool {
        self.finished_at.is_some()
    }

    #[inline]
    pub fn distance_travelled_km(&self) -> f64 {
        self.distance_travelled_m / 1_000.0
    }

    /// Seconds from the start until the car stopped racing: the end of the
    /// finishing tick, the start of the draining tick, or the whole period.
    pub fn time_taken_secs(&self) -> f64 {
        match (self.finished_at, self.drained_at) {
            (Some(j), _) => (j + 1) as f64 * self.tick_secs,
            (None, Some(k)) => k as f64 * self.tick_secs,
            (None, None) => self.duration_secs,
        }
    }

    #[inline]
    pub fn time_taken_hours(&self) -> f64 {
        self.time_taken_secs() / 3_600.0
    }

    /// Clamped state-of-charge at the last tick.
    pub fn final_soc(&self) -> f64 {
        self.state_of_charge.last().copied().unwrap_or(f64::NAN)
    }

    pub fn output(&self, return_type: ReturnType) -> RunOutput {
        match return_type {
            ReturnType::TimeTaken => RunOutput::TimeTaken { hours: self.time_taken_hours() },
            ReturnType::DistanceTravelled => RunOutput::DistanceTravelled { km: self.distance_travelled_km() },
            ReturnType::DistanceAndTime => RunOutput::DistanceAndTime {
                km:    self.distance_travelled_km(),
                hours: self.time_taken_hours(),
            },
            ReturnType::Void => RunOutput::Void,
        }
    }

    /// Score this run; higher is better.
    ///
    /// - Drained (or overcharged, when `penalize_overcharge`):
    ///   `Infeasible { deficit_wh }`.
    /// - `MaximizeDistance`: kilometres travelled.
    /// - `MinimizeTime`: negated hours to finish.  A run that never reaches
    ///   the finish is charged the whole period plus the remaining distance
    ///   at `max_speed_kmh`, so any finisher outranks it.
    pub fn fitness(&self, objective: Objective, max_speed_kmh: f64, penalize_overcharge: bool) -> SimResult<Fitness> {
        let mut deficit = if self.drained() { self.deficit_wh } else { 0.0 };
        if penalize_overcharge {
            deficit = deficit.max(self.overcharge_wh);
        }
        if self.drained() || deficit > 0.0 {
            return Ok(Fitness::Infeasible { deficit_wh: deficit });
        }

        match objective {
            Objective::MaximizeDistance => Ok(Fitness::Feasible(self.distance_travelled_km())),
            Objective::MinimizeTime => {
                let length = self.route_length_m.ok_or_else(|| {
                    SimError::Config("time objective needs a route with a finish line".into())
                })?;
                if self.finished() {
                    return Ok(Fitness::Feasible(-self.time_taken_hours()));
                }
                let remaining_km = (length - self.distance_travelled_m).max(0.0) / 1_000.0;
                let hours = self.duration_secs / 3_600.0 + remaining_km / max_speed_kmh.max(f64::EPSILON);
                Ok(Fitness::Feasible(-hours))
            }
        }
    }
}
