//! Solar array harvest model.

use crate::{CarError, CarResult};

/// Flat array with a fixed area and conversion efficiency.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BasicArray {
    /// Cell area (m²).
    pub area:       f64,
    /// Irradiance-to-bus efficiency [0, 1].
    pub efficiency: f64,
}

impl BasicArray {
    pub const DAYBREAK: BasicArray = BasicArray { area: 4.0, efficiency: 0.24 };

    pub fn validate(&self) -> CarResult<()> {
        if !(self.area.is_finite() && self.area >= 0.0) {
            return Err(CarError::InvalidConstant { name: "array_area", value: self.area });
        }
        if !(0.0..=1.0).contains(&self.efficiency) {
            return Err(CarError::InvalidConstant { name: "array_efficiency", value: self.efficiency });
        }
        Ok(())
    }

    /// Electrical power (W) under `irradiance` W/m².
    #[inline]
    pub fn power(&self, irradiance: f64) -> f64 {
        irradiance.max(0.0) * self.area * self.efficiency
    }

    /// Energy (J) harvested per tick.
    pub fn calculate_produced_energy(&self, irradiance: &[f64], tick_secs: f64) -> Vec<f64> {
        irradiance.iter().map(|&g| self.power(g) * tick_secs).collect()
    }
}

impl Default for BasicArray {
    fn default() -> Self {
        Self::DAYBREAK
    }
}
