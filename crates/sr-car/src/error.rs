use thiserror::Error;

#[derive(Debug, Error)]
pub enum CarError {
    #[error("invalid vehicle constant {name}: {value}")]
    InvalidConstant {
        name:  &'static str,
        value: f64,
    },

    #[error("initial state of charge {0} is outside [0, 1]")]
    InitialSoc(f64),
}

pub type CarResult<T> = Result<T, CarError>;
