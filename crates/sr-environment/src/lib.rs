//! `sr-environment`: everything outside the car that feeds the energy
//! balance.
//!
//! # Modules
//!
//! | Module          | Contents                                                     |
//! |-----------------|--------------------------------------------------------------|
//! | [`solar_time`]  | Equation of time, apparent solar time, declination           |
//! | [`solar`]       | `SolarCalculations`: DNI/DHI/GHI, tilt, cloud attenuation    |
//! | [`route`]       | `RouteProfile` trait, `FlatRoute`, `WaypointRoute`           |
//! | [`weather`]     | `Weather` trait, `ClearSky`, uniform and hourly cloud cover  |
//! | [`error`]       | `EnvironmentError`                                           |
//!
//! Route geometry and live weather normally come from external GIS and
//! forecast services.  The traits here are the seams those services plug
//! into; the bundled implementations cover synthetic routes and fixed
//! forecasts.

pub mod error;
pub mod route;
pub mod solar;
pub mod solar_time;
pub mod weather;

#[cfg(test)]
mod tests;

pub use error::{EnvironmentError, EnvironmentResult};
pub use route::{FlatRoute, RoutePoint, RouteProfile, WaypointRoute};
pub use solar::{IrradianceSample, SolarCalculations};
pub use weather::{ClearSky, HourlyCloudCover, UniformCloudCover, Weather};
