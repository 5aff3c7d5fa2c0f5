//! `sr-car`: energy models of the solar race vehicle.
//!
//! Every model here is a pure function of its constants and inputs.  The
//! only stateful type is [`BasicBattery`], and it is rebuilt per simulation
//! run so that repeated or parallel fitness evaluations never share state.
//!
//! | Module          | Contents                                                   |
//! |-----------------|------------------------------------------------------------|
//! | [`equations`]   | `PackConstants`, calibrated charge/voltage/energy mappings  |
//! | [`battery`]     | `Battery` trait, `BasicBattery`, `BatteryTrajectory`       |
//! | [`lvs`]         | `LowVoltageSystem` constant parasitic draw                 |
//! | [`motor`]       | `BasicMotor` road-load power model                         |
//! | [`array`]       | `BasicArray` solar harvest model                           |
//! | [`vehicle`]     | `VehicleConstants` bundle                                  |
//!
//! # Units
//!
//! Energies crossing model boundaries are joules (per tick, or cumulative);
//! the battery converts to watt-hours internally.  Charge is in amp-hours.

pub mod array;
pub mod battery;
pub mod equations;
pub mod error;
pub mod lvs;
pub mod motor;
pub mod vehicle;


pub use array::BasicArray;
pub use battery::{Battery, BasicBattery, BatteryState, BatteryTrajectory};
pub use equations::PackConstants;
pub use error::{CarError, CarResult};
pub use lvs::LowVoltageSystem;
pub use motor::BasicMotor;
pub use vehicle::VehicleConstants;
