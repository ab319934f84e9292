use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("unknown restart strategy: {0}")]
    UnknownRestart(String),

    #[error("unknown jitter strategy: {0}")]
    UnknownJitter(String),

    #[error("unknown route target: {0}")]
    UnknownRouteTarget(String),

    #[error("invalid model: {0}")]
    Invalid(String),
}

pub type ModelResult<T> = Result<T, ModelError>;
