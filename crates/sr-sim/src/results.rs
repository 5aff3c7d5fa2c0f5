//! Named result series for export.
//!
//! Callers ask for results by name.  `"default"` expands in place to
//! [`DEFAULT_KEYS`]; any other unrecognised name is a usage error.

use std::str::FromStr;

use crate::run::RaceRun;
use crate::{SimError, SimResult};

/// Name a caller can request from [`RaceRun::get_results`].
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum ResultKey {
    SpeedKmh,
    Distances,
    CumulativeDistance,
    StateOfCharge,
    RawSoc,
    Voltage,
    StoredEnergy,
    DeltaEnergy,
    CumulativeEnergy,
    MotorConsumedEnergy,
    LvsConsumedEnergy,
    ArrayProducedEnergy,
    SolarIrradiance,
    CloudCover,
    Elevations,
    Gradients,
    Driving,
    TimeTaken,
    DistanceTravelled,
    FinalSoc,
}

/// What `"default"` expands to.
pub const DEFAULT_KEYS: [ResultKey; 6] = [
    ResultKey::SpeedKmh,
    ResultKey::DistanceTravelled,
    ResultKey::StateOfCharge,
    ResultKey::DeltaEnergy,
    ResultKey::SolarIrradiance,
    ResultKey::CloudCover,
];

impl ResultKey {
    pub const ALL: [ResultKey; 20] = [
        ResultKey::SpeedKmh,
        ResultKey::Distances,
        ResultKey::CumulativeDistance,
        ResultKey::StateOfCharge,
        ResultKey::RawSoc,
        ResultKey::Voltage,
        ResultKey::StoredEnergy,
        ResultKey::DeltaEnergy,
        ResultKey::CumulativeEnergy,
        ResultKey::MotorConsumedEnergy,
        ResultKey::LvsConsumedEnergy,
        ResultKey::ArrayProducedEnergy,
        ResultKey::SolarIrradiance,
        ResultKey::CloudCover,
        ResultKey::Elevations,
        ResultKey::Gradients,
        ResultKey::Driving,
        ResultKey::TimeTaken,
        ResultKey::DistanceTravelled,
        ResultKey::FinalSoc,
    ];

    /// Column name in exported files.
    pub fn as_str(self) -> &'static str {
        match self {
            ResultKey::SpeedKmh            => "speed_kmh",
            ResultKey::Distances           => "distances",
            ResultKey::CumulativeDistance  => "cumulative_distance",
            ResultKey::StateOfCharge       => "state_of_charge",
            ResultKey::RawSoc              => "raw_soc",
            ResultKey::Voltage             => "voltage",
            ResultKey::StoredEnergy        => "stored_energy",
            ResultKey::DeltaEnergy         => "delta_energy",
            ResultKey::CumulativeEnergy    => "cumulative_energy",
            ResultKey::MotorConsumedEnergy => "motor_consumed_energy",
            ResultKey::LvsConsumedEnergy   => "lvs_consumed_energy",
            ResultKey::ArrayProducedEnergy => "array_produced_energy",
            ResultKey::SolarIrradiance     => "solar_irradiance",
            ResultKey::CloudCover          => "cloud_cover",
            ResultKey::Elevations          => "elevations",
            ResultKey::Gradients           => "gradients",
            ResultKey::Driving             => "driving",
            ResultKey::TimeTaken           => "time_taken",
            ResultKey::DistanceTravelled   => "distance_travelled",
            ResultKey::FinalSoc            => "final_soc",
        }
    }

    /// Resolve requested names in order, expanding `"default"`.
    pub fn expand<S: AsRef<str>>(names: &[S]) -> SimResult<Vec<ResultKey>> {
        let mut keys = Vec::with_capacity(names.len());
        for name in names {
            match name.as_ref() {
                "default" => keys.extend_from_slice(&DEFAULT_KEYS),
                other => keys.push(other.parse()?),
            }
        }
        Ok(keys)
    }
}

impl FromStr for ResultKey {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ResultKey::ALL
            .iter()
            .copied()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| SimError::UnknownResultKey(s.to_owned()))
    }
}

impl std::fmt::Display for ResultKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A requested result: one value per tick, or a single summary number.
#[derive(Clone, Debug, PartialEq)]
pub enum ResultValue {
    Series(Vec<f64>),
    Scalar(f64),
}

impl ResultValue {
    pub fn as_series(&self) -> Option<&[f64]> {
        match self {
            ResultValue::Series(v) => Some(v),
            ResultValue::Scalar(_) => None,
        }
    }

    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            ResultValue::Scalar(x) => Some(*x),
            ResultValue::Series(_) => None,
        }
    }
}

impl RaceRun {
    /// The value behind one key.  Distances are metres; `distance_travelled`
    /// is kilometres and `time_taken` hours.
    pub fn value(&self, key: ResultKey) -> ResultValue {
        use ResultValue::{Scalar, Series};
        match key {
            ResultKey::SpeedKmh            => Series(self.speed_kmh.clone()),
            ResultKey::Distances           => Series(self.distances.clone()),
            ResultKey::CumulativeDistance  => Series(self.cumulative_distance.clone()),
            ResultKey::StateOfCharge       => Series(self.state_of_charge.clone()),
            ResultKey::RawSoc              => Series(self.raw_soc.clone()),
            ResultKey::Voltage             => Series(self.voltage.clone()),
            ResultKey::StoredEnergy        => Series(self.stored_energy.clone()),
            ResultKey::DeltaEnergy         => Series(self.delta_energy.clone()),
            ResultKey::CumulativeEnergy    => Series(self.cumulative_energy.clone()),
            ResultKey::MotorConsumedEnergy => Series(self.motor_consumed_energy.clone()),
            ResultKey::LvsConsumedEnergy   => Series(self.lvs_consumed_energy.clone()),
            ResultKey::ArrayProducedEnergy => Series(self.array_produced_energy.clone()),
            ResultKey::SolarIrradiance     => Series(self.solar_irradiance.clone()),
            ResultKey::CloudCover          => Series(self.cloud_cover.clone()),
            ResultKey::Elevations          => Series(self.elevations.clone()),
            ResultKey::Gradients           => Series(self.gradients.clone()),
            ResultKey::Driving             => Series(self.driving.iter().map(|&d| d as u8 as f64).collect()),
            ResultKey::TimeTaken           => Scalar(self.time_taken_hours()),
            ResultKey::DistanceTravelled   => Scalar(self.distance_travelled_km()),
            ResultKey::FinalSoc            => Scalar(self.final_soc()),
        }
    }

    /// Requested results, in request order.
    pub fn get_results<S: AsRef<str>>(&self, names: &[S]) -> SimResult<Vec<(ResultKey, ResultValue)>> {
        Ok(ResultKey::expand(names)?
            .into_iter()
            .map(|key| (key, self.value(key)))
            .collect())
    }
}
