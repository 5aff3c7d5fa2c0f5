//! Road-load motor model.
//!
//! Tractive force at speed `v` (m/s) on a slope with grade `g` (rise / run):
//!
//! ```text
//! θ = atan(g)
//! F = ½·ρ·CdA·v² + Crr·m·9.81·cos θ + m·9.81·sin θ
//! P = F·v                                   (mechanical, W)
//! ```
//!
//! Battery-side power divides positive `P` by the drivetrain efficiency and
//! multiplies negative `P` (descending) by the regeneration efficiency.

use crate::{CarError, CarResult};

const GRAVITY: f64 = 9.81;

#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BasicMotor {
    /// Vehicle plus driver mass (kg).
    pub vehicle_mass:          f64,
    /// Drag coefficient times frontal area (m²).
    pub drag_area:             f64,
    /// Rolling-resistance coefficient (dimensionless).
    pub rolling_resistance:    f64,
    /// Air density (kg/m³).
    pub air_density:           f64,
    /// Battery-to-wheel efficiency while driving (0, 1].
    pub drivetrain_efficiency: f64,
    /// Wheel-to-battery efficiency while braking or descending [0, 1].
    pub regen_efficiency:      f64,
}

impl BasicMotor {
    pub const DAYBREAK: BasicMotor = BasicMotor {
        vehicle_mass:          350.0,
        drag_area:             0.28,
        rolling_resistance:    0.0055,
        air_density:           1.225,
        drivetrain_efficiency: 0.90,
        regen_efficiency:      0.50,
    };

    pub fn validate(&self) -> CarResult<()> {
        let positive = [
            ("vehicle_mass", self.vehicle_mass),
            ("air_density", self.air_density),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(CarError::InvalidConstant { name, value });
            }
        }
        let non_negative = [
            ("drag_area", self.drag_area),
            ("rolling_resistance", self.rolling_resistance),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(CarError::InvalidConstant { name, value });
            }
        }
        if !(self.drivetrain_efficiency > 0.0 && self.drivetrain_efficiency <= 1.0) {
            return Err(CarError::InvalidConstant {
                name:  "drivetrain_efficiency",
                value: self.drivetrain_efficiency,
            });
        }
        if !(0.0..=1.0).contains(&self.regen_efficiency) {
            return Err(CarError::InvalidConstant {
                name:  "regen_efficiency",
                value: self.regen_efficiency,
            });
        }
        Ok(())
    }

    /// Battery-side power (W) at `speed_ms` on `grade`; negative when
    /// regenerating.  A stationary car draws nothing.
    pub fn power(&self, speed_ms: f64, grade: f64) -> f64 {
        if speed_ms <= 0.0 {
            return 0.0;
        }
        let theta = grade.atan();
        let drag = 0.5 * self.air_density * self.drag_area * speed_ms * speed_ms;
        let rolling = self.rolling_resistance * self.vehicle_mass * GRAVITY * theta.cos();
        let climbing = self.vehicle_mass * GRAVITY * theta.sin();
        let mechanical = (drag + rolling + climbing) * speed_ms;
        if mechanical >= 0.0 {
            mechanical / self.drivetrain_efficiency
        } else {
            mechanical * self.regen_efficiency
        }
    }

    /// Energy (J) drawn per tick for per-tick speeds (km/h) and gradients.
    ///
    /// The two slices are zipped; the result has the shorter length.
    pub fn calculate_energy_in(&self, speeds_kmh: &[f64], gradients: &[f64], tick_secs: f64) -> Vec<f64> {
        speeds_kmh
            .iter()
            .zip(gradients)
            .map(|(&v, &g)| self.power(v / 3.6, g) * tick_secs)
            .collect()
    }
}

impl Default for BasicMotor {
    fn default() -> Self {
        Self::DAYBREAK
    }
}
