//! Battery pack state and batch trajectory computation.
//!
//! # Batch, not incremental
//!
//! A battery never steps tick-by-tick.  It is handed the *cumulative* net
//! energy trace for an entire run (joules, positive = charging) and maps
//! every entry independently through the calibrated equations:
//!
//! ```text
//! stored[i]     = initial_stored + cumulative[i] / 3600          (Wh)
//! discharged[i] = Emax − clamp(stored[i], 0, Emax)
//! q[i]          = E⁻¹(discharged[i])
//! soc[i], V[i]  = soc(q[i]), V(q[i])
//! ```
//!
//! [`Battery::get_raw_soc`] skips the clamp, so its output leaves `[0, 1]`
//! when the trace over- or under-runs the pack.  That excursion is the
//! feasibility signal the optimizer consumes.

use crate::equations::PackConstants;
use crate::{CarError, CarResult};

/// Joules per watt-hour.
pub const JOULES_PER_WH: f64 = 3_600.0;

// ── BatteryState ─────────────────────────────────────────────────────────────

/// Snapshot of the pack at one instant.
///
/// `stored_energy` and `discharge_capacity` are always mutually derivable
/// through the pack's calibrated equations; `state_of_charge` is clamped.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BatteryState {
    pub max_voltage:          f64,
    pub min_voltage:          f64,
    pub max_current_capacity: f64,
    pub max_energy_capacity:  f64,
    pub stored_energy:        f64,
    pub voltage:              f64,
    pub state_of_charge:      f64,
    pub discharge_capacity:   f64,
}

impl BatteryState {
    /// State of `pack` at state-of-charge `soc`.
    fn from_soc(pack: &PackConstants, soc: f64) -> Self {
        let discharge_capacity = pack.discharge_capacity_from_soc(soc);
        let max_energy_capacity = pack.max_energy_capacity();
        Self {
            max_voltage:          pack.max_voltage,
            min_voltage:          pack.min_voltage,
            max_current_capacity: pack.max_current_capacity,
            max_energy_capacity,
            stored_energy:        max_energy_capacity
                - pack.energy_from_discharge_capacity(discharge_capacity),
            voltage:              pack.voltage_from_discharge_capacity(discharge_capacity),
            state_of_charge:      soc,
            discharge_capacity,
        }
    }
}

// ── BatteryTrajectory ────────────────────────────────────────────────────────

/// Per-tick pack trajectories produced by [`Battery::update_array`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BatteryTrajectory {
    pub state_of_charge: Vec<f64>,
    pub voltage:         Vec<f64>,
    /// Watt-hours, clamped to `[0, max_energy_capacity]`.
    pub stored_energy:   Vec<f64>,
}

impl BatteryTrajectory {
    #[inline]
    pub fn len(&self) -> usize {
        self.state_of_charge.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.state_of_charge.is_empty()
    }
}

// ── Battery trait ────────────────────────────────────────────────────────────

/// Capability set of every battery model.
pub trait Battery {
    /// The pack state after the most recent [`update_array`][Self::update_array]
    /// (the initial state before any update).
    fn state(&self) -> &BatteryState;

    /// Map a cumulative energy trace (J) to clamped SOC, voltage, and stored
    /// energy trajectories.
    ///
    /// Always computed relative to the battery's *initial* state, so calling
    /// this twice with the same trace yields the same result.  The current
    /// state moves to the last entry of the trace.
    fn update_array(&mut self, cumulative_energy: &[f64]) -> BatteryTrajectory;

    /// Unclamped state-of-charge for the same trace; may leave `[0, 1]`.
    fn get_raw_soc(&self, cumulative_energy: &[f64]) -> Vec<f64>;
}

// ── BasicBattery ─────────────────────────────────────────────────────────────

/// Single-pack battery driven by the linear-voltage calibration in
/// [`equations`][crate::equations].
#[derive(Clone, Debug)]
pub struct BasicBattery {
    pack:    PackConstants,
    initial: BatteryState,
    current: BatteryState,
}

impl BasicBattery {
    /// Build a battery at `state_of_charge` (must lie in `[0, 1]`).
    pub fn new(pack: PackConstants, state_of_charge: f64) -> CarResult<Self> {
        pack.validate()?;
        if !(0.0..=1.0).contains(&state_of_charge) {
            return Err(CarError::InitialSoc(state_of_charge));
        }
        let initial = BatteryState::from_soc(&pack, state_of_charge);
        Ok(Self { pack, initial, current: initial })
    }

    #[inline]
    pub fn pack(&self) -> &PackConstants {
        &self.pack
    }

    #[inline]
    pub fn initial_state(&self) -> &BatteryState {
        &self.initial
    }

    /// Unclamped stored energy (Wh) for a cumulative energy trace (J).
    pub fn get_raw_stored_energy(&self, cumulative_energy: &[f64]) -> Vec<f64> {
        cumulative_energy
            .iter()
            .map(|&e| self.initial.stored_energy + e / JOULES_PER_WH)
            .collect()
    }

    fn soc_from_stored(&self, stored: f64) -> f64 {
        let q = self
            .pack
            .discharge_capacity_from_energy(self.initial.max_energy_capacity - stored);
        self.pack.soc_from_discharge_capacity(q)
    }
}

impl Battery for BasicBattery {
    fn state(&self) -> &BatteryState {
        &self.current
    }

    fn update_array(&mut self, cumulative_energy: &[f64]) -> BatteryTrajectory {
        let e_max = self.initial.max_energy_capacity;
        let n = cumulative_energy.len();
        let mut trajectory = BatteryTrajectory {
            state_of_charge: Vec::with_capacity(n),
            voltage:         Vec::with_capacity(n),
            stored_energy:   Vec::with_capacity(n),
        };

        let mut last_q = self.initial.discharge_capacity;
        for stored in self.get_raw_stored_energy(cumulative_energy) {
            let stored = stored.clamp(0.0, e_max);
            // The pack limits are pinned exactly; round-off in the quadratic
            // root would otherwise leave a residue of ±1e-16 at the clamps.
            let (q, soc) = if stored <= 0.0 {
                (self.pack.max_current_capacity, 0.0)
            } else if stored >= e_max {
                (0.0, 1.0)
            } else {
                let q = self.pack.discharge_capacity_from_energy(e_max - stored);
                (q, self.pack.soc_from_discharge_capacity(q).clamp(0.0, 1.0))
            };
            trajectory.state_of_charge.push(soc);
            trajectory.voltage.push(self.pack.voltage_from_discharge_capacity(q));
            trajectory.stored_energy.push(stored);
            last_q = q;
        }

        if let (Some(&soc), Some(&voltage), Some(&stored)) = (
            trajectory.state_of_charge.last(),
            trajectory.voltage.last(),
            trajectory.stored_energy.last(),
        ) {
            self.current = BatteryState {
                stored_energy:      stored,
                voltage,
                state_of_charge:    soc,
                discharge_capacity: last_q,
                ..self.initial
            };
        }
        trajectory
    }

    fn get_raw_soc(&self, cumulative_energy: &[f64]) -> Vec<f64> {
        self.get_raw_stored_energy(cumulative_energy)
            .into_iter()
            .map(|stored| self.soc_from_stored(stored))
            .collect()
    }
}
