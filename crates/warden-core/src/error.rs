use thiserror::Error;

use crate::runner::RunnerError;
use warden_model::ModelError;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("no suitable runner for process: {0}")]
    NoRunner(String),

    #[error("duplicate process name: {0}")]
    DuplicateName(String),

    #[error("process '{process}' requires env var '{name}' which is not set")]
    MissingEnv { process: String, name: String },

    #[error("process '{task}' terminated fatally: {reason}")]
    FatalTask { task: String, reason: String },

    #[error("process '{task}' exhausted its restart budget: {reason}")]
    Exhausted { task: String, reason: String },

    #[error("shutdown grace period exceeded; processes were terminated forcibly")]
    GraceExceeded,

    #[error("runner error: {0}")]
    Runner(#[from] RunnerError),

    #[error("model error: {0}")]
    Model(#[from] ModelError),
}
