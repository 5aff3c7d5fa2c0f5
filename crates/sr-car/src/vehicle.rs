//! Bundle of every physical constant of the car.

use crate::{BasicArray, BasicMotor, CarError, CarResult, PackConstants};

/// Physical constants supplied once per vehicle configuration.
///
/// Deserializes from a JSON object; any omitted group falls back to the
/// reference vehicle.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct VehicleConstants {
    pub pack:        PackConstants,
    pub motor:       BasicMotor,
    pub array:       BasicArray,
    /// Low-voltage bus voltage (V).
    pub lvs_voltage: f64,
}

impl VehicleConstants {
    pub const DAYBREAK: VehicleConstants = VehicleConstants {
        pack:        PackConstants::DAYBREAK,
        motor:       BasicMotor::DAYBREAK,
        array:       BasicArray::DAYBREAK,
        lvs_voltage: 12.0,
    };

    pub fn validate(&self) -> CarResult<()> {
        self.pack.validate()?;
        self.motor.validate()?;
        self.array.validate()?;
        if !(self.lvs_voltage.is_finite() && self.lvs_voltage > 0.0) {
            return Err(CarError::InvalidConstant { name: "lvs_voltage", value: self.lvs_voltage });
        }
        Ok(())
    }
}

impl Default for VehicleConstants {
    fn default() -> Self {
        Self::DAYBREAK
    }
}
