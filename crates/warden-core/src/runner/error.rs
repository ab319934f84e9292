use thiserror::Error;

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("runner '{runner}' does not support process '{process}'")]
    Unsupported {
        runner: &'static str,
        process: String,
    },

    #[error("invalid specification: {0}")]
    InvalidSpec(String),

    #[error("internal error: {0}")]
    Internal(String),

    #[error("io error: {0}")]
    Io(String),
}

impl From<std::io::Error> for RunnerError {
    fn from(e: std::io::Error) -> Self {
        RunnerError::Io(e.to_string())
    }
}
