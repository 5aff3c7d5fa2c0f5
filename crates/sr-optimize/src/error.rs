use sr_sim::SimError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OptimizeError {
    #[error("invalid optimization settings: {0}")]
    Settings(String),

    #[error("invalid search bounds: {0}")]
    Bounds(String),

    #[error("fitness evaluation failed: {0}")]
    Simulation(#[from] SimError),

    #[error("surrogate model failed: {0}")]
    Surrogate(String),
}

pub type OptimizeResult<T> = Result<T, OptimizeError>;
