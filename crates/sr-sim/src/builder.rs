//! Fluent builder for constructing a [`Simulation`].

use sr_car::VehicleConstants;
use sr_core::{Granularity, RaceClock, RaceType};
use sr_environment::{RouteProfile, Weather};

use crate::sim::{Simulation, SimulationConfig};
use crate::SimResult;

/// Default start day when none is given (early July).
const DEFAULT_START_DAY: u32 = 186;

/// Fluent builder for [`Simulation<R, W>`].
///
/// # Required inputs
///
/// - [`RaceType`]: selects the daily driving window
/// - `R: RouteProfile`: position, elevation, grade along the route
/// - `W: Weather`: cloud cover along the route
///
/// # Optional inputs (have defaults)
///
/// | Method                    | Default                                    |
/// |---------------------------|--------------------------------------------|
/// | `.granularity(g)`         | 1 division per hour                        |
/// | `.tick_secs(s)`           | 60 s                                       |
/// | `.start(day, hour)`       | day 186, start of the driving window       |
/// | `.duration_secs(s)`       | length of one driving window               |
/// | `.initial_soc(x)`         | 1.0                                        |
/// | `.lvs_power_loss(w)`      | 20 W                                       |
/// | `.vehicle(v)`             | `VehicleConstants::DAYBREAK`               |
/// | `.speed_bounds(lo, hi)`   | 0–90 km/h                                  |
/// | `.penalize_overcharge(b)` | `false`                                    |
///
/// # Example
///
/// ```rust,ignore
/// let sim = SimulationBuilder::new(RaceType::Fsgp, route, ClearSky)
///     .granularity(Granularity(2))
///     .initial_soc(0.9)
///     .build()?;
/// let distance = sim.run(&sim.constant_schedule(40.0), ReturnType::DistanceTravelled)?;
/// ```
pub struct SimulationBuilder<R: RouteProfile, W: Weather> {
    race_type:           RaceType,
    route:               R,
    weather:             W,
    granularity:         Granularity,
    tick_secs:           u32,
    start_day:           u32,
    start_hour:          Option<u32>,
    duration_secs:       Option<u64>,
    initial_soc:         f64,
    lvs_power_loss:      f64,
    vehicle:             VehicleConstants,
    speed_bounds:        (f64, f64),
    penalize_overcharge: bool,
}

impl<R: RouteProfile, W: Weather> SimulationBuilder<R, W> {
    /// Create a builder with all required inputs.
    pub fn new(race_type: RaceType, route: R, weather: W) -> Self {
        Self {
            race_type,
            route,
            weather,
            granularity:         Granularity::default(),
            tick_secs:           60,
            start_day:           DEFAULT_START_DAY,
            start_hour:          None,
            duration_secs:       None,
            initial_soc:         1.0,
            lvs_power_loss:      20.0,
            vehicle:             VehicleConstants::DAYBREAK,
            speed_bounds:        (0.0, 90.0),
            penalize_overcharge: false,
        }
    }

    pub fn granularity(mut self, granularity: Granularity) -> Self {
        self.granularity = granularity;
        self
    }

    pub fn tick_secs(mut self, tick_secs: u32) -> Self {
        self.tick_secs = tick_secs;
        self
    }

    /// Day of year and local clock hour of the first tick.
    pub fn start(mut self, day_of_year: u32, hour: u32) -> Self {
        self.start_day = day_of_year;
        self.start_hour = Some(hour);
        self
    }

    pub fn duration_secs(mut self, duration_secs: u64) -> Self {
        self.duration_secs = Some(duration_secs);
        self
    }

    pub fn initial_soc(mut self, soc: f64) -> Self {
        self.initial_soc = soc;
        self
    }

    pub fn lvs_power_loss(mut self, watts: f64) -> Self {
        self.lvs_power_loss = watts;
        self
    }

    pub fn vehicle(mut self, vehicle: VehicleConstants) -> Self {
        self.vehicle = vehicle;
        self
    }

    pub fn speed_bounds(mut self, min_kmh: f64, max_kmh: f64) -> Self {
        self.speed_bounds = (min_kmh, max_kmh);
        self
    }

    pub fn penalize_overcharge(mut self, penalize: bool) -> Self {
        self.penalize_overcharge = penalize;
        self
    }

    /// The configuration this builder describes, without validating it.
    pub fn config(&self) -> SimResult<SimulationConfig> {
        let (window_start, window_end) = self.race_type.driving_hours();
        let start_hour = self.start_hour.unwrap_or(window_start);
        let duration_secs = self
            .duration_secs
            .unwrap_or(u64::from(window_end - window_start) * 3_600);

        Ok(SimulationConfig {
            race_type:           self.race_type,
            granularity:         self.granularity,
            clock:               RaceClock::new(self.start_day, start_hour, self.tick_secs)?,
            duration_secs,
            initial_soc:         self.initial_soc,
            lvs_power_loss:      self.lvs_power_loss,
            vehicle:             self.vehicle,
            min_speed_kmh:       self.speed_bounds.0,
            max_speed_kmh:       self.speed_bounds.1,
            penalize_overcharge: self.penalize_overcharge,
        })
    }

    /// Validate inputs and return a ready-to-run [`Simulation`].
    pub fn build(self) -> SimResult<Simulation<R, W>> {
        let config = self.config()?;
        Simulation::new(config, self.route, self.weather)
    }
}
