//! Race time model.
//!
//! # Design
//!
//! Time is represented as a monotonically increasing `Tick` counter.  The
//! mapping to local clock time is held in `RaceClock`:
//!
//!   local_hours = start_hour + tick * tick_secs / 3600
//!
//! The schedule the optimizer searches over is coarser than the tick: one
//! speed per *time division*, with `Granularity` divisions per hour.  Every
//! division spans a whole number of ticks and the simulated duration spans a
//! whole number of divisions; [`Granularity::validate`] enforces both.

use std::fmt;

use crate::{CoreError, CoreResult};

/// Seconds in one hour.
pub const SECS_PER_HOUR: u64 = 3_600;

/// Days in the (non-leap) year used for day-of-year roll-over.
pub const DAYS_PER_YEAR: u32 = 365;

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute simulation tick counter.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    /// Return the tick `n` steps after `self`.
    #[inline]
    pub fn offset(self, n: u64) -> Tick {
        Tick(self.0 + n)
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    #[inline]
    fn add(self, rhs: u64) -> Tick {
        Tick(self.0 + rhs)
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── RaceClock ────────────────────────────────────────────────────────────────

/// Converts tick indices into day-of-year and local clock time.
///
/// `RaceClock` is `Copy` and holds no heap data.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RaceClock {
    /// Day of the year of tick 0 (1 = January 1).
    pub start_day_of_year: u32,
    /// Local clock hour of tick 0 (0–23).
    pub start_hour:        u32,
    /// How many seconds one tick represents.
    pub tick_secs:         u32,
}

impl RaceClock {
    pub fn new(start_day_of_year: u32, start_hour: u32, tick_secs: u32) -> CoreResult<Self> {
        if !(1..=DAYS_PER_YEAR).contains(&start_day_of_year) {
            return Err(CoreError::Validation {
                what:   "start day of year",
                reason: format!("{start_day_of_year} is outside 1..={DAYS_PER_YEAR}"),
            });
        }
        if start_hour >= 24 {
            return Err(CoreError::Validation {
                what:   "start hour",
                reason: format!("{start_hour} is not a clock hour"),
            });
        }
        if tick_secs == 0 {
            return Err(CoreError::Validation {
                what:   "tick duration",
                reason: "must be at least one second".into(),
            });
        }
        Ok(Self { start_day_of_year, start_hour, tick_secs })
    }

    /// Elapsed simulated seconds at the start of `tick`.
    #[inline]
    pub fn elapsed_secs(&self, tick: Tick) -> u64 {
        tick.0 * self.tick_secs as u64
    }

    /// `(day_of_year, local_hours)` at the start of `tick`.
    ///
    /// `local_hours` is fractional (`9.5` = 09:30).  The day rolls over at
    /// midnight and the year after day 365.
    pub fn local_time(&self, tick: Tick) -> (u32, f64) {
        let secs = self.start_hour as u64 * SECS_PER_HOUR + self.elapsed_secs(tick);
        let days = secs / 86_400;
        let hour = (secs % 86_400) as f64 / SECS_PER_HOUR as f64;
        let day = ((self.start_day_of_year - 1) as u64 + days) % DAYS_PER_YEAR as u64 + 1;
        (day as u32, hour)
    }

    /// How many ticks span `secs` seconds (exact; callers validate first).
    #[inline]
    pub fn ticks_for_secs(&self, secs: u64) -> u64 {
        secs / self.tick_secs as u64
    }
}

impl fmt::Display for RaceClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "day {} {:02}:00 (tick {} s)",
            self.start_day_of_year, self.start_hour, self.tick_secs
        )
    }
}

// ── Granularity ──────────────────────────────────────────────────────────────

/// Number of schedule time divisions per hour (1 = hourly, 2 = half-hourly…).
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Granularity(pub u32);

impl Default for Granularity {
    fn default() -> Self {
        Granularity(1)
    }
}

impl Granularity {
    /// Length of one time division in seconds.
    #[inline]
    pub fn division_secs(self) -> u64 {
        SECS_PER_HOUR / self.0.max(1) as u64
    }

    /// Ticks per division; only meaningful after [`validate`][Self::validate].
    #[inline]
    pub fn ticks_per_division(self, tick_secs: u32) -> u64 {
        self.division_secs() / tick_secs.max(1) as u64
    }

    /// Number of divisions in `duration_secs`.
    #[inline]
    pub fn division_count(self, duration_secs: u64) -> usize {
        (duration_secs / self.division_secs()) as usize
    }

    /// Check that the division length is a whole number of seconds, that
    /// ticks tile each division exactly, and that divisions tile the
    /// simulated duration exactly.
    pub fn validate(self, tick_secs: u32, duration_secs: u64) -> CoreResult<()> {
        if self.0 == 0 || SECS_PER_HOUR % self.0 as u64 != 0 {
            return Err(CoreError::Validation {
                what:   "granularity",
                reason: format!("{} divisions per hour does not divide one hour evenly", self.0),
            });
        }
        let division = self.division_secs();
        if tick_secs == 0 || division % tick_secs as u64 != 0 {
            return Err(CoreError::Validation {
                what:   "granularity",
                reason: format!("tick of {tick_secs} s does not divide a {division} s division"),
            });
        }
        if duration_secs == 0 || duration_secs % division != 0 {
            return Err(CoreError::Validation {
                what:   "granularity",
                reason: format!("{division} s divisions do not tile a {duration_secs} s duration"),
            });
        }
        Ok(())
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/h", self.0)
    }
}
