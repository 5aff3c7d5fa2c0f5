//! Clear-sky irradiance with cloud attenuation.
//!
//! All angles are degrees.  References:
//! - elevation: <https://www.pveducation.org/pvcdrom/properties-of-sunlight/elevation-angle>
//! - air mass (Kasten–Young): <https://www.pveducation.org/pvcdrom/properties-of-sunlight/air-mass>
//! - insolation: <https://www.pveducation.org/pvcdrom/properties-of-sunlight/calculation-of-solar-insolation>
//! - cloud cover: <http://www.shodor.org/os411/courses/_master/tools/calculators/solarrad/>
//!
//! # Night masking
//!
//! The air-mass relation has a pole at zenith 96.07995° and is meaningless
//! past the horizon, so every irradiance component is *defined* as exactly
//! `0.0` whenever zenith ≥ 90°.  The formula is never evaluated there.

use sr_core::GeoPoint;

use crate::solar_time::{declination_angle, local_time_to_apparent_solar_time};
use crate::{EnvironmentError, EnvironmentResult};

/// Solar constant (W/m²).
pub const SOLAR_CONSTANT: f64 = 1_353.0;

/// Altitude attenuation coefficient in the DNI model.
const ALTITUDE_COEFFICIENT: f64 = 0.14;

/// Tilt angles the array can be propped at while stationary.
pub const MOUNT_ANGLES: [f64; 4] = [0.0, 15.0, 30.0, 45.0];

// ── IrradianceSample ─────────────────────────────────────────────────────────

/// Everything needed to compute the effective irradiance for one tick.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct IrradianceSample {
    pub coord:            GeoPoint,
    pub utc_offset_hours: f64,
    pub day_of_year:      u32,
    /// Local clock time in hours from midnight.
    pub local_time:       f64,
    /// Height above sea level (m).
    pub elevation_m:      f64,
    /// Percent, 0–100.
    pub cloud_cover:      f64,
    pub driving:          bool,
}

// ── SolarCalculations ────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct SolarCalculations {
    solar_constant: f64,
    mount_angles:   Vec<f64>,
}

impl Default for SolarCalculations {
    fn default() -> Self {
        Self { solar_constant: SOLAR_CONSTANT, mount_angles: MOUNT_ANGLES.to_vec() }
    }
}

impl SolarCalculations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the discrete stationary mount angles.  An empty set falls
    /// back to flat (0°).
    pub fn with_mount_angles(mut self, angles: &[f64]) -> Self {
        self.mount_angles = if angles.is_empty() { vec![0.0] } else { angles.to_vec() };
        self
    }

    // ── Sun position ──────────────────────────────────────────────────────

    /// Negative in the morning, 0 at solar noon, positive in the afternoon.
    pub fn hour_angle(&self, utc_offset_hours: f64, day_of_year: u32, local_time: f64, longitude: f64) -> f64 {
        let lst = local_time_to_apparent_solar_time(utc_offset_hours, day_of_year as f64, local_time, longitude);
        15.0 * (lst - 12.0)
    }

    pub fn elevation_angle(&self, coord: GeoPoint, utc_offset_hours: f64, day_of_year: u32, local_time: f64) -> f64 {
        let declination = declination_angle(day_of_year as f64).to_radians();
        let hour_angle = self.hour_angle(utc_offset_hours, day_of_year, local_time, coord.lon).to_radians();
        let lat = coord.lat.to_radians();
        let sin_elevation =
            declination.sin() * lat.sin() + declination.cos() * lat.cos() * hour_angle.cos();
        sin_elevation.clamp(-1.0, 1.0).asin().to_degrees()
    }

    pub fn zenith_angle(&self, coord: GeoPoint, utc_offset_hours: f64, day_of_year: u32, local_time: f64) -> f64 {
        90.0 - self.elevation_angle(coord, utc_offset_hours, day_of_year, local_time)
    }

    /// Degrees clockwise from north.
    pub fn azimuth_angle(&self, coord: GeoPoint, utc_offset_hours: f64, day_of_year: u32, local_time: f64) -> f64 {
        let declination = declination_angle(day_of_year as f64).to_radians();
        let hour_angle = self.hour_angle(utc_offset_hours, day_of_year, local_time, coord.lon);
        let lat = coord.lat.to_radians();
        let elevation = self
            .elevation_angle(coord, utc_offset_hours, day_of_year, local_time)
            .to_radians();

        let cos_azimuth = (declination.sin() * lat.cos()
            - declination.cos() * lat.sin() * hour_angle.to_radians().cos())
            / elevation.cos().max(1e-10);
        let azimuth = cos_azimuth.clamp(-1.0, 1.0).acos().to_degrees();
        if hour_angle > 0.0 { 360.0 - azimuth } else { azimuth }
    }

    // ── Irradiance components ─────────────────────────────────────────────

    /// Clear-sky direct normal irradiance (W/m²) at `zenith` for a site
    /// `elevation_m` metres above sea level.
    pub fn dni(&self, zenith: f64, elevation_m: f64) -> f64 {
        if zenith >= 90.0 {
            return 0.0;
        }
        let air_mass = 1.0 / (zenith.to_radians().cos() + 0.50572 * (96.07995 - zenith).powf(-1.6364));
        let h = ALTITUDE_COEFFICIENT * elevation_m * 0.001;
        self.solar_constant * ((1.0 - h) * 0.7f64.powf(air_mass.powf(0.678)) + h)
    }

    /// Diffuse horizontal irradiance (W/m²).
    #[inline]
    pub fn dhi(&self, dni: f64) -> f64 {
        0.1 * dni
    }

    /// Clear-sky global horizontal irradiance (W/m²).
    pub fn ghi(&self, zenith: f64, elevation_m: f64) -> f64 {
        let dni = self.dni(zenith, elevation_m);
        if dni == 0.0 {
            return 0.0;
        }
        dni * zenith.to_radians().cos() + self.dhi(dni)
    }

    /// Clear-sky irradiance on a stationary array propped at the best of the
    /// discrete mount angles.
    ///
    /// The effective zenith is `min |zenith − angle|`, substituted into the
    /// GHI formula.  Night masking still uses the true zenith.
    pub fn angled_irradiance(&self, zenith: f64, elevation_m: f64) -> f64 {
        let dni = self.dni(zenith, elevation_m);
        if dni == 0.0 {
            return 0.0;
        }
        let effective_zenith = self
            .mount_angles
            .iter()
            .map(|&angle| (zenith - angle).abs())
            .fold(f64::INFINITY, f64::min);
        dni * effective_zenith.to_radians().cos() + self.dhi(dni)
    }

    /// Empirical cloud attenuation: `ghi · (1 − 0.75·(cc/100)^3.4)`.
    pub fn apply_cloud_cover(&self, ghi: f64, cloud_cover: f64) -> EnvironmentResult<f64> {
        if !(0.0..=100.0).contains(&cloud_cover) {
            return Err(EnvironmentError::CloudCover(cloud_cover));
        }
        Ok(ghi * (1.0 - 0.75 * (cloud_cover / 100.0).powf(3.4)))
    }

    // ── Per-tick selection ────────────────────────────────────────────────

    /// Cloud-attenuated irradiance for one tick: driving GHI while moving,
    /// angled irradiance while stationary.
    pub fn effective_irradiance(&self, sample: &IrradianceSample) -> EnvironmentResult<f64> {
        let zenith = self.zenith_angle(sample.coord, sample.utc_offset_hours, sample.day_of_year, sample.local_time);
        let clear = if sample.driving {
            self.ghi(zenith, sample.elevation_m)
        } else {
            self.angled_irradiance(zenith, sample.elevation_m)
        };
        self.apply_cloud_cover(clear, sample.cloud_cover)
    }

    /// [`effective_irradiance`][Self::effective_irradiance] over a whole trip.
    ///
    /// Fails on the first sample with out-of-range cloud cover.
    pub fn calculate_array_ghi(&self, samples: &[IrradianceSample]) -> EnvironmentResult<Vec<f64>> {
        samples.iter().map(|s| self.effective_irradiance(s)).collect()
    }
}
