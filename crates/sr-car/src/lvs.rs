//! Low-voltage system (telemetry, lights, controllers) parasitic draw.

use crate::{CarError, CarResult};

/// Constant-power draw on the 12 V bus.
#[derive(Clone, Debug, PartialEq)]
pub struct LowVoltageSystem {
    /// Bus current (A).
    pub current:     f64,
    /// Bus voltage (V).
    pub voltage:     f64,
    /// Energy reported by the most recent
    /// [`get_consumed_energy`][Self::get_consumed_energy] call (J).
    consumed_energy: f64,
}

impl LowVoltageSystem {
    pub fn new(current: f64, voltage: f64) -> CarResult<Self> {
        if !(current.is_finite() && current >= 0.0) {
            return Err(CarError::InvalidConstant { name: "lvs_current", value: current });
        }
        if !(voltage.is_finite() && voltage > 0.0) {
            return Err(CarError::InvalidConstant { name: "lvs_voltage", value: voltage });
        }
        Ok(Self { current, voltage, consumed_energy: 0.0 })
    }

    /// Build from a power loss figure (W) on a bus of `voltage` volts.
    pub fn from_power(power_w: f64, voltage: f64) -> CarResult<Self> {
        if !(power_w.is_finite() && power_w >= 0.0) {
            return Err(CarError::InvalidConstant { name: "lvs_power_loss", value: power_w });
        }
        if !(voltage.is_finite() && voltage > 0.0) {
            return Err(CarError::InvalidConstant { name: "lvs_voltage", value: voltage });
        }
        Self::new(power_w / voltage, voltage)
    }

    #[inline]
    pub fn power(&self) -> f64 {
        self.current * self.voltage
    }

    /// Energy (J) drawn over `tick_secs` seconds; remembered for reporting.
    pub fn get_consumed_energy(&mut self, tick_secs: f64) -> f64 {
        self.consumed_energy = self.power() * tick_secs;
        self.consumed_energy
    }

    /// The value returned by the last `get_consumed_energy` call.
    #[inline]
    pub fn consumed_energy(&self) -> f64 {
        self.consumed_energy
    }
}
