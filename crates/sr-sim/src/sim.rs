//! `SimulationConfig`, `Simulation`, and the per-run energy balance.

use sr_car::{Battery, BasicBattery, LowVoltageSystem, VehicleConstants};
use sr_core::{Fitness, Granularity, RaceClock, RaceType, Tick};
use sr_environment::{IrradianceSample, RouteProfile, SolarCalculations, Weather};
use tracing::debug;

use crate::run::{Objective, RaceRun, ReturnType, RunOutput};
use crate::{SimError, SimResult};

// ── SimulationConfig ─────────────────────────────────────────────────────────

/// Immutable description of one race scenario.
///
/// Built by [`SimulationBuilder`][crate::SimulationBuilder] or from the JSON
/// documents in [`config`][crate::config]; validated once by
/// [`Simulation::new`].
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationConfig {
    pub race_type:           RaceType,
    pub granularity:         Granularity,
    /// Start day/hour and tick duration.
    pub clock:               RaceClock,
    /// Total simulated seconds (a whole number of divisions).
    pub duration_secs:       u64,
    /// Initial battery state-of-charge in `[0, 1]`.
    pub initial_soc:         f64,
    /// Constant low-voltage-system draw (W).
    pub lvs_power_loss:      f64,
    pub vehicle:             VehicleConstants,
    /// Lower speed bound offered to optimizers (km/h).
    pub min_speed_kmh:       f64,
    /// Upper speed bound offered to optimizers (km/h).
    pub max_speed_kmh:       f64,
    /// Also treat raw state-of-charge above 1 as infeasible.
    pub penalize_overcharge: bool,
}

impl SimulationConfig {
    #[inline]
    pub fn tick_secs(&self) -> u32 {
        self.clock.tick_secs
    }

    #[inline]
    pub fn tick_count(&self) -> usize {
        self.clock.ticks_for_secs(self.duration_secs) as usize
    }

    #[inline]
    pub fn division_count(&self) -> usize {
        self.granularity.division_count(self.duration_secs)
    }

    #[inline]
    pub fn ticks_per_division(&self) -> usize {
        self.granularity.ticks_per_division(self.clock.tick_secs) as usize
    }

    pub fn validate(&self) -> SimResult<()> {
        self.granularity.validate(self.clock.tick_secs, self.duration_secs)?;
        self.vehicle.validate()?;
        if !(0.0..=1.0).contains(&self.initial_soc) {
            return Err(SimError::Config(format!(
                "initial battery charge {} is outside [0, 1]",
                self.initial_soc
            )));
        }
        if !(self.lvs_power_loss.is_finite() && self.lvs_power_loss >= 0.0) {
            return Err(SimError::Config(format!("LVS power loss {} W", self.lvs_power_loss)));
        }
        if !(self.min_speed_kmh.is_finite()
            && self.max_speed_kmh.is_finite()
            && self.min_speed_kmh >= 0.0
            && self.max_speed_kmh > 0.0
            && self.min_speed_kmh <= self.max_speed_kmh)
        {
            return Err(SimError::Config(format!(
                "speed bounds [{}, {}] km/h",
                self.min_speed_kmh, self.max_speed_kmh
            )));
        }
        Ok(())
    }
}

// ── Simulation ───────────────────────────────────────────────────────────────

/// A validated, ready-to-run race scenario.
///
/// `Simulation` is immutable after construction.  [`run_model`][Self::run_model]
/// builds its own battery and load models on every call, so one instance can
/// be shared by reference across parallel fitness evaluations.
pub struct Simulation<R: RouteProfile, W: Weather> {
    config:            SimulationConfig,
    route:             R,
    weather:           W,
    solar:             SolarCalculations,
    /// One flag per time division: inside the race's daily driving window.
    driving_divisions: Vec<bool>,
}

impl<R: RouteProfile, W: Weather> Simulation<R, W> {
    /// Validate `config` and precompute the driving-window mask.
    pub fn new(config: SimulationConfig, route: R, weather: W) -> SimResult<Self> {
        config.validate()?;

        let per_division = config.ticks_per_division() as u64;
        let driving_divisions: Vec<bool> = (0..config.division_count() as u64)
            .map(|d| {
                let (_, hour) = config.clock.local_time(Tick(d * per_division));
                config.race_type.is_driving_hour(hour)
            })
            .collect();

        if !driving_divisions.iter().any(|&d| d) {
            return Err(SimError::Config(format!(
                "no {} driving window falls inside the simulated period starting {}",
                config.race_type, config.clock
            )));
        }

        debug!(
            race      = %config.race_type,
            divisions = driving_divisions.len(),
            driving   = driving_divisions.iter().filter(|&&d| d).count(),
            ticks     = config.tick_count(),
            "simulation ready"
        );

        Ok(Self { config, route, weather, solar: SolarCalculations::new(), driving_divisions })
    }

    #[inline]
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    #[inline]
    pub fn route(&self) -> &R {
        &self.route
    }

    /// Number of time divisions inside the driving window.  A speed schedule
    /// has exactly this many entries.
    pub fn get_driving_time_divisions(&self) -> usize {
        self.driving_divisions.iter().filter(|&&d| d).count()
    }

    /// Per-division driving-window mask over the whole simulated period.
    #[inline]
    pub fn driving_divisions(&self) -> &[bool] {
        &self.driving_divisions
    }

    /// `(min, max)` speed in km/h for schedule positions.
    #[inline]
    pub fn speed_bounds(&self) -> (f64, f64) {
        (self.config.min_speed_kmh, self.config.max_speed_kmh)
    }

    /// A schedule holding `speed_kmh` at every driving division.
    pub fn constant_schedule(&self, speed_kmh: f64) -> Vec<f64> {
        vec![speed_kmh; self.get_driving_time_divisions()]
    }

    /// Objective value of `speeds` as a [`Fitness`].
    ///
    /// Drained schedules are never an error; they come back as
    /// [`Fitness::Infeasible`].
    pub fn fitness(&self, speeds: &[f64], objective: Objective) -> SimResult<Fitness> {
        let run = self.run_model(speeds)?;
        run.fitness(objective, self.config.max_speed_kmh, self.config.penalize_overcharge)
    }

    /// Run and reduce to the requested output.
    pub fn run(&self, speeds: &[f64], return_type: ReturnType) -> SimResult<RunOutput> {
        Ok(self.run_model(speeds)?.output(return_type))
    }

    // ── Core model ────────────────────────────────────────────────────────

    /// Simulate the whole period for one speed schedule.
    ///
    /// Per tick: expand the schedule, move along the route, look up cloud
    /// cover and irradiance, sum motor, LVS, and array energy into a net
    /// trace, and hand the cumulative trace to a fresh battery.
    pub fn run_model(&self, speeds: &[f64]) -> SimResult<RaceRun> {
        self.check_schedule(speeds)?;

        let cfg = &self.config;
        let n = cfg.tick_count();
        let tick_secs = cfg.tick_secs() as f64;
        let per_division = cfg.ticks_per_division();
        let route_length = self.route.length_m();

        // ── Schedule → per-tick speed, distance, route position ───────────
        let mut speed_kmh = Vec::with_capacity(n);
        let mut in_window = Vec::with_capacity(n);
        let mut next_entry = speeds.iter().copied();
        for &driving in &self.driving_divisions {
            let v = if driving { next_entry.next().unwrap_or(0.0) } else { 0.0 };
            speed_kmh.extend(std::iter::repeat_n(v, per_division));
            in_window.extend(std::iter::repeat_n(driving, per_division));
        }

        let mut distances = Vec::with_capacity(n);
        let mut cumulative_distance = Vec::with_capacity(n);
        let mut completed_at = None;
        let mut travelled = 0.0;
        for i in 0..n {
            let mut d = speed_kmh[i] / 3.6 * tick_secs;
            if let Some(length) = route_length {
                if completed_at.is_some() {
                    d = 0.0;
                    speed_kmh[i] = 0.0;
                } else if travelled + d >= length && d > 0.0 {
                    d = (length - travelled).max(0.0);
                    speed_kmh[i] = d / tick_secs * 3.6;
                    completed_at = Some(i);
                }
            }
            distances.push(d);
            travelled += d;
            cumulative_distance.push(travelled);
        }

        // ── Environment along the way ─────────────────────────────────────
        let mut coords = Vec::with_capacity(n);
        let mut elevations = Vec::with_capacity(n);
        let mut gradients = Vec::with_capacity(n);
        let mut cloud_cover = Vec::with_capacity(n);
        let mut driving = Vec::with_capacity(n);
        let mut samples = Vec::with_capacity(n);
        for i in 0..n {
            let midpoint = cumulative_distance[i] - distances[i] * 0.5;
            let point = self.route.sample(midpoint);
            let tick = Tick(i as u64);
            let (day_of_year, local_time) = cfg.clock.local_time(tick);
            let cc = self.weather.cloud_cover(point.coord, cfg.clock.elapsed_secs(tick));
            let moving = in_window[i] && speed_kmh[i] > 0.0;

            samples.push(IrradianceSample {
                coord:            point.coord,
                utc_offset_hours: point.utc_offset_hours,
                day_of_year,
                local_time,
                elevation_m:      point.elevation_m,
                cloud_cover:      cc,
                driving:          moving,
            });
            coords.push(point.coord);
            elevations.push(point.elevation_m);
            gradients.push(point.grade);
            cloud_cover.push(cc);
            driving.push(moving);
        }
        let solar_irradiance = self.solar.calculate_array_ghi(&samples)?;

        // ── Energy balance ────────────────────────────────────────────────
        let vehicle = &cfg.vehicle;
        let motor_consumed_energy = vehicle.motor.calculate_energy_in(&speed_kmh, &gradients, tick_secs);
        let array_produced_energy = vehicle.array.calculate_produced_energy(&solar_irradiance, tick_secs);
        let mut lvs = LowVoltageSystem::from_power(cfg.lvs_power_loss, vehicle.lvs_voltage)?;
        let lvs_per_tick = lvs.get_consumed_energy(tick_secs);
        let lvs_consumed_energy = vec![lvs_per_tick; n];

        let delta_energy: Vec<f64> = (0..n)
            .map(|i| array_produced_energy[i] - motor_consumed_energy[i] - lvs_consumed_energy[i])
            .collect();
        let cumulative_energy: Vec<f64> = delta_energy
            .iter()
            .scan(0.0, |acc, &e| {
                *acc += e;
                Some(*acc)
            })
            .collect();

        // ── Battery ───────────────────────────────────────────────────────
        let mut battery = BasicBattery::new(vehicle.pack, cfg.initial_soc)?;
        let trajectory = battery.update_array(&cumulative_energy);
        let raw_soc = battery.get_raw_soc(&cumulative_energy);
        let raw_stored = battery.get_raw_stored_energy(&cumulative_energy);
        let max_energy = vehicle.pack.max_energy_capacity();

        // The first tick that would take the pack below empty ends the race;
        // that tick's distance is not credited.  Parked draw after the
        // finish line does not count.
        let drained_at = raw_soc
            .iter()
            .position(|&s| s < 0.0)
            .filter(|&k| completed_at.is_none_or(|j| k <= j));
        let finished_at = completed_at.filter(|&j| drained_at.is_none_or(|k| k > j));

        let credited = drained_at.unwrap_or(n);
        let distance_travelled: f64 = distances[..credited].iter().sum();
        speed_kmh[credited..].fill(0.0);
        distances[credited..].fill(0.0);
        cumulative_distance[credited..].fill(distance_travelled);

        let scored = finished_at.map_or(n, |j| j + 1);
        let deficit_wh = raw_stored[..scored].iter().fold(0.0_f64, |m, &e| m.max(-e));
        let overcharge_wh = raw_stored[..scored].iter().fold(0.0_f64, |m, &e| m.max(e - max_energy));

        let run = RaceRun {
            tick_secs,
            duration_secs: cfg.duration_secs as f64,
            route_length_m: route_length,
            speed_kmh,
            distances,
            cumulative_distance,
            driving,
            coords,
            elevations,
            gradients,
            cloud_cover,
            solar_irradiance,
            motor_consumed_energy,
            lvs_consumed_energy,
            array_produced_energy,
            delta_energy,
            cumulative_energy,
            state_of_charge: trajectory.state_of_charge,
            voltage: trajectory.voltage,
            stored_energy: trajectory.stored_energy,
            raw_soc,
            drained_at,
            finished_at,
            distance_travelled_m: distance_travelled,
            deficit_wh,
            overcharge_wh,
        };

        debug!(
            distance_km = run.distance_travelled_km(),
            finished    = run.finished(),
            drained_at  = ?run.drained_at,
            final_soc   = run.final_soc(),
            "run complete"
        );
        Ok(run)
    }

    fn check_schedule(&self, speeds: &[f64]) -> SimResult<()> {
        let expected = self.get_driving_time_divisions();
        if speeds.len() != expected {
            return Err(SimError::LengthMismatch {
                expected,
                got:  speeds.len(),
                what: "speed schedule",
            });
        }
        if let Some((index, &value)) = speeds
            .iter()
            .enumerate()
            .find(|&(_, v)| !(v.is_finite() && *v >= 0.0))
        {
            return Err(SimError::InvalidSpeed { index, value });
        }
        Ok(())
    }
}
