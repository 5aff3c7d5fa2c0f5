use std::path::PathBuf;

use sr_car::CarError;
use sr_core::CoreError;
use sr_environment::EnvironmentError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error("{what} length {got} does not match expected {expected}")]
    LengthMismatch {
        expected: usize,
        got:      usize,
        what:     &'static str,
    },

    #[error("invalid speed {value} km/h at schedule position {index}")]
    InvalidSpeed {
        index: usize,
        value: f64,
    },

    #[error("unknown result key {0:?}")]
    UnknownResultKey(String),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("vehicle model error: {0}")]
    Car(#[from] CarError),

    #[error("environment model error: {0}")]
    Environment(#[from] EnvironmentError),

    #[error("I/O error on {path}: {source}")]
    Io {
        path:   PathBuf,
        source: std::io::Error,
    },

    #[error("malformed JSON in {path}: {source}")]
    Json {
        path:   PathBuf,
        source: serde_json::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type SimResult<T> = Result<T, SimError>;
