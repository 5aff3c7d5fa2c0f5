//! Cached speed-schedule loader.
//!
//! # CSV format
//!
//! One column, one row per driving time division, in schedule order:
//!
//! ```csv
//! speed_kmh
//! 42.0
//! 45.5
//! ```
//!
//! The file's length must equal the scenario's driving division count;
//! a cached schedule from a different granularity or race window is
//! rejected rather than stretched.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use crate::{SimError, SimResult};

#[derive(Deserialize)]
struct SpeedRecord {
    speed_kmh: f64,
}

/// Load a cached schedule of exactly `expected_len` speeds.
pub fn load_speeds_csv(path: &Path, expected_len: usize) -> SimResult<Vec<f64>> {
    let file = std::fs::File::open(path).map_err(|source| SimError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_speeds_reader(file, expected_len)
}

/// Like [`load_speeds_csv`] but accepts any `Read` source.
pub fn load_speeds_reader<R: Read>(reader: R, expected_len: usize) -> SimResult<Vec<f64>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut speeds = Vec::with_capacity(expected_len);
    for (index, row) in csv_reader.deserialize::<SpeedRecord>().enumerate() {
        let value = row?.speed_kmh;
        if !(value.is_finite() && value >= 0.0) {
            return Err(SimError::InvalidSpeed { index, value });
        }
        speeds.push(value);
    }
    if speeds.len() != expected_len {
        return Err(SimError::LengthMismatch {
            expected: expected_len,
            got:      speeds.len(),
            what:     "cached speed schedule",
        });
    }
    Ok(speeds)
}
