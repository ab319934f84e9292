use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::{
    Env, Flag, ProcName,
    error::{ModelError, ModelResult},
    strategy::{BackoffStrategy, RestartBudget, RestartStrategy},
};

/// Declarative specification of one supervised child process.
///
/// A `ProcessSpec` describes *what* to run and *how* its lifecycle is
/// managed. Specs come from static configuration, are validated once at
/// startup and never change afterwards; the supervisor keeps at most one
/// live instance per spec name.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessSpec {
    /// Unique process name used in logs, events and the state table.
    pub name: ProcName,
    /// Command to execute (e.g. `/usr/local/bin/uvicorn`).
    pub command: String,
    /// Command-line arguments.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,
    /// Image-baked environment defaults for the process.
    ///
    /// At launch these are merged with the allow-listed overrides from
    /// the ambient environment; the overrides win.
    #[serde(default, skip_serializing_if = "Env::is_empty")]
    pub env: Env,
    /// Working directory. If `None`, inherits from the supervisor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cwd: Option<PathBuf>,
    /// Variable names that must be resolvable in the final environment.
    ///
    /// A missing name is a startup failure: the container aborts before
    /// anything is spawned.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required_env: Vec<String>,
    /// Whether permanent failure of this process takes the container down.
    #[serde(default)]
    pub critical: Flag,
    /// Whether non-zero exit codes count as failures.
    #[serde(default)]
    pub fail_on_non_zero: Flag,
    /// Restart strategy applied after the process exits.
    #[serde(default)]
    pub restart: RestartStrategy,
    /// Delay configuration between restart attempts.
    #[serde(default)]
    pub backoff: BackoffStrategy,
    /// Bound on restarts within a sliding window.
    #[serde(default)]
    pub budget: RestartBudget,
}

impl ProcessSpec {
    /// Validate the spec before it reaches the supervisor.
    ///
    /// Rules:
    /// - `name` and `command` are not empty or whitespace-only;
    /// - the restart window is non-zero when restarts are possible.
    pub fn validate(&self) -> ModelResult<()> {
        if self.name.trim().is_empty() {
            return Err(ModelError::Invalid("process name is empty".into()));
        }
        if self.command.trim().is_empty() {
            return Err(ModelError::Invalid(format!(
                "process '{}' has an empty command",
                self.name
            )));
        }
        if self.restart != RestartStrategy::Never && self.budget.window_ms == 0 {
            return Err(ModelError::Invalid(format!(
                "process '{}' has a zero-width restart window",
                self.name
            )));
        }
        Ok(())
    }
}
