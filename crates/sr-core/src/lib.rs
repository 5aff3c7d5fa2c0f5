//! `sr-core`: foundational types for the solar race simulator.
//!
//! This crate is a dependency of every other `sr-*` crate.  It has no `sr-*`
//! dependencies and minimal external ones (only `rand` and `thiserror`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`geo`]         | `GeoPoint`, haversine distance, interpolation         |
//! | [`time`]        | `Tick`, `RaceClock`, `Granularity`                    |
//! | [`race`]        | `RaceType` enum and daily driving windows             |
//! | [`fitness`]     | `Fitness` (feasible / infeasible total order)         |
//! | [`rng`]         | `SimRng` (seeded, reproducible searches)              |
//! | [`error`]       | `CoreError`, `CoreResult`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod error;
pub mod fitness;
pub mod geo;
pub mod race;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult};
pub use fitness::Fitness;
pub use geo::GeoPoint;
pub use race::RaceType;
pub use rng::SimRng;
pub use time::{Granularity, RaceClock, Tick};
