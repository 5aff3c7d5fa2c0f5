use thiserror::Error;

#[derive(Debug, Error)]
pub enum EnvironmentError {
    #[error("cloud cover {0} is outside [0, 100]")]
    CloudCover(f64),

    #[error("invalid route: {0}")]
    Route(String),
}

pub type EnvironmentResult<T> = Result<T, EnvironmentError>;
