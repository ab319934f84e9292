use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{ModelError, ModelResult};

/// Controls whether a finished process is scheduled again.
///
/// - `Never`: one shot; the process is not restarted for any reason.
/// - `Always`: restart after every exit, successful or not.
/// - `OnFailure`: restart only after a failed exit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RestartStrategy {
    Never,
    Always,
    OnFailure,
}

impl Default for RestartStrategy {
    fn default() -> Self {
        RestartStrategy::OnFailure
    }
}

impl FromStr for RestartStrategy {
    type Err = ModelError;
    fn from_str(s: &str) -> ModelResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "always" => Ok(RestartStrategy::Always),
            "never" | "" => Ok(RestartStrategy::Never),
            "on-failure" | "failure" => Ok(RestartStrategy::OnFailure),
            other => Err(ModelError::UnknownRestart(other.to_string())),
        }
    }
}
