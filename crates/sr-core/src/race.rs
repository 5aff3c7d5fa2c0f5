//! Race type selector shared by configuration, simulation, and CLI.

use std::str::FromStr;

use crate::CoreError;

/// The competition format being simulated.
///
/// Only the two formats the vehicle races in are accepted; anything else is
/// rejected at parse time.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RaceType {
    /// American Solar Challenge: point-to-point road route.
    #[cfg_attr(feature = "serde", serde(rename = "ASC"))]
    Asc,
    /// Formula Sun Grand Prix: closed-circuit track race.
    #[cfg_attr(feature = "serde", serde(rename = "FSGP"))]
    Fsgp,
}

impl RaceType {
    /// Label used in file names and CSV columns.
    pub fn as_str(self) -> &'static str {
        match self {
            RaceType::Asc  => "ASC",
            RaceType::Fsgp => "FSGP",
        }
    }

    /// Daily driving window as `[start, end)` local clock hours.
    pub fn driving_hours(self) -> (u32, u32) {
        match self {
            RaceType::Asc  => (9, 18),
            RaceType::Fsgp => (9, 17),
        }
    }

    /// `true` if the car is allowed to drive at local time `hour`.
    #[inline]
    pub fn is_driving_hour(self, hour: f64) -> bool {
        let (start, end) = self.driving_hours();
        hour >= start as f64 && hour < end as f64
    }

    /// Track races loop the same circuit; road races have a finish line.
    #[inline]
    pub fn is_looped(self) -> bool {
        matches!(self, RaceType::Fsgp)
    }
}

impl FromStr for RaceType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ASC"  => Ok(RaceType::Asc),
            "FSGP" => Ok(RaceType::Fsgp),
            other  => Err(CoreError::Parse(format!(
                "unknown race type {other:?} (expected ASC or FSGP)"
            ))),
        }
    }
}

impl std::fmt::Display for RaceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
