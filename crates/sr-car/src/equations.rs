//! Calibrated battery-pack equations.
//!
//! The pack's open-circuit voltage is modelled as falling linearly with the
//! charge extracted since full (`q`, amp-hours):
//!
//! ```text
//! V(q) = Vmax − (Vmax − Vmin) · q / Q
//! E(q) = ∫₀^q V = Vmax·q − (Vmax − Vmin)·q² / (2Q)          (Wh discharged)
//! soc  = 1 − q / Q
//! ```
//!
//! so `E(Q) = Q·(Vmax + Vmin)/2` is the pack's energy capacity.
//!
//! # Outside the calibrated domain
//!
//! `q ∈ [0, Q]` is the calibrated domain.  Outside it:
//!
//! - `V` saturates at `Vmax` (q < 0) or `Vmin` (q > Q).
//! - `E` continues linearly with that saturated voltage, and
//!   `E⁻¹` is its exact inverse.  Raw (unclamped) state-of-charge therefore
//!   leaves `[0, 1]` at a finite, linear rate proportional to the energy
//!   excursion, never faster.
//!
//! All mappings are monotonic over the whole real line: `V` and `soc` are
//! non-increasing in `q`, `E` is strictly increasing.

use crate::{CarError, CarResult};

/// Physical constants of a battery pack.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PackConstants {
    /// Pack voltage when full (V).
    pub max_voltage:          f64,
    /// Pack voltage when empty (V).
    pub min_voltage:          f64,
    /// Nominal charge capacity (Ah).
    pub max_current_capacity: f64,
}

impl PackConstants {
    /// The reference pack: 32 series cells, 134.4 V full, 86.4 V empty,
    /// 48.75 Ah.
    pub const DAYBREAK: PackConstants = PackConstants {
        max_voltage:          134.4,
        min_voltage:          86.4,
        max_current_capacity: 48.75,
    };

    pub fn new(max_voltage: f64, min_voltage: f64, max_current_capacity: f64) -> CarResult<Self> {
        let pack = Self { max_voltage, min_voltage, max_current_capacity };
        pack.validate()?;
        Ok(pack)
    }

    /// Check the constants describe a physical pack.
    pub fn validate(&self) -> CarResult<()> {
        if !(self.min_voltage.is_finite() && self.min_voltage > 0.0) {
            return Err(CarError::InvalidConstant { name: "min_voltage", value: self.min_voltage });
        }
        if !(self.max_voltage.is_finite() && self.max_voltage >= self.min_voltage) {
            return Err(CarError::InvalidConstant { name: "max_voltage", value: self.max_voltage });
        }
        if !(self.max_current_capacity.is_finite() && self.max_current_capacity > 0.0) {
            return Err(CarError::InvalidConstant {
                name:  "max_current_capacity",
                value: self.max_current_capacity,
            });
        }
        Ok(())
    }

    /// Nominal energy capacity (Wh).
    #[inline]
    pub fn max_energy_capacity(&self) -> f64 {
        self.max_current_capacity * (self.max_voltage + self.min_voltage) * 0.5
    }

    // ── Scalar mappings ───────────────────────────────────────────────────

    #[inline]
    pub fn voltage_from_discharge_capacity(&self, q: f64) -> f64 {
        let q = q.clamp(0.0, self.max_current_capacity);
        self.max_voltage - (self.max_voltage - self.min_voltage) * q / self.max_current_capacity
    }

    /// Energy discharged (Wh) after extracting `q` Ah from a full pack.
    pub fn energy_from_discharge_capacity(&self, q: f64) -> f64 {
        let cap = self.max_current_capacity;
        if q < 0.0 {
            self.max_voltage * q
        } else if q > cap {
            self.max_energy_capacity() + self.min_voltage * (q - cap)
        } else {
            self.max_voltage * q - (self.max_voltage - self.min_voltage) * q * q / (2.0 * cap)
        }
    }

    /// Inverse of [`energy_from_discharge_capacity`][Self::energy_from_discharge_capacity].
    pub fn discharge_capacity_from_energy(&self, e: f64) -> f64 {
        let cap = self.max_current_capacity;
        let e_max = self.max_energy_capacity();
        if e < 0.0 {
            e / self.max_voltage
        } else if e > e_max {
            cap + (e - e_max) / self.min_voltage
        } else {
            // Root of k·q² − Vmax·q + E = 0 with k = (Vmax − Vmin)/(2Q), written
            // as 2E / (Vmax + √disc) to stay exact when Vmax == Vmin.
            let k = (self.max_voltage - self.min_voltage) / (2.0 * cap);
            let disc = (self.max_voltage * self.max_voltage - 4.0 * k * e).max(0.0);
            2.0 * e / (self.max_voltage + disc.sqrt())
        }
    }

    #[inline]
    pub fn soc_from_discharge_capacity(&self, q: f64) -> f64 {
        1.0 - q / self.max_current_capacity
    }

    #[inline]
    pub fn discharge_capacity_from_soc(&self, soc: f64) -> f64 {
        (1.0 - soc) * self.max_current_capacity
    }
}

impl Default for PackConstants {
    fn default() -> Self {
        Self::DAYBREAK
    }
}

// ── Elementwise mappings ─────────────────────────────────────────────────────

pub fn calculate_voltage_from_discharge_capacity(pack: &PackConstants, q: &[f64]) -> Vec<f64> {
    q.iter().map(|&x| pack.voltage_from_discharge_capacity(x)).collect()
}

pub fn calculate_energy_from_discharge_capacity(pack: &PackConstants, q: &[f64]) -> Vec<f64> {
    q.iter().map(|&x| pack.energy_from_discharge_capacity(x)).collect()
}

pub fn calculate_discharge_capacity_from_energy(pack: &PackConstants, e: &[f64]) -> Vec<f64> {
    e.iter().map(|&x| pack.discharge_capacity_from_energy(x)).collect()
}

pub fn calculate_soc_from_discharge_capacity(pack: &PackConstants, q: &[f64]) -> Vec<f64> {
    q.iter().map(|&x| pack.soc_from_discharge_capacity(x)).collect()
}

pub fn calculate_discharge_capacity_from_soc(pack: &PackConstants, soc: &[f64]) -> Vec<f64> {
    soc.iter().map(|&x| pack.discharge_capacity_from_soc(x)).collect()
}
