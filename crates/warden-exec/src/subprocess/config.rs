use std::{fmt, path::PathBuf};

use warden_core::BuildContext;
use warden_model::{Env, ProcessSpec};

use crate::ExecError;

/// Resolved configuration for one subprocess attempt.
#[derive(Debug, Clone)]
pub(crate) struct SubprocessConfig {
    /// Process name used in logs and the state table.
    pub(crate) name: String,
    /// Command to execute.
    pub(crate) command: String,
    /// Command-line arguments.
    pub(crate) args: Vec<String>,
    /// Final merged environment: spec defaults overridden by the
    /// allow-listed launch env from the build context.
    pub(crate) env: Env,
    /// Working directory; inherits the supervisor's when `None`.
    pub(crate) cwd: Option<PathBuf>,
    /// Whether non-zero exit codes count as failures.
    pub(crate) fail_on_non_zero: bool,
}

impl SubprocessConfig {
    pub(crate) fn from_spec(spec: &ProcessSpec, ctx: &BuildContext) -> Self {
        Self {
            name: spec.name.clone(),
            command: spec.command.clone(),
            args: spec.args.clone(),
            env: spec.env.merged(ctx.override_env()),
            cwd: spec.cwd.clone(),
            fail_on_non_zero: spec.fail_on_non_zero.is_enabled(),
        }
    }

    /// Validate the configuration before spawning.
    pub(crate) fn validate(&self) -> Result<(), ExecError> {
        if self.command.trim().is_empty() {
            return Err(ExecError::InvalidSpec(format!(
                "subprocess '{}' has an empty command",
                self.name
            )));
        }
        Ok(())
    }
}

impl fmt::Display for SubprocessConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SubprocessConfig(name='{}', cmd='{}', args={}, env={}, cwd={:?})",
            self.name,
            self.command,
            self.args.len(),
            self.env.len(),
            self.cwd,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::SubprocessConfig;
    use warden_core::BuildContext;
    use warden_model::{Env, ProcessSpec};

    fn spec() -> ProcessSpec {
        serde_json::from_str(
            r#"{
                "name": "backend",
                "command": "uvicorn",
                "env": [
                    {"key": "GEMINI_API_KEY", "value": "baked"},
                    {"key": "GEMINI_MODEL", "value": "gemini-2.0-flash"}
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn launch_overrides_win_over_baked_env() {
        let mut overrides = Env::new();
        overrides.push("GEMINI_API_KEY", "from-launch");

        let ctx = BuildContext::default().with_override_env(overrides);
        let cfg = SubprocessConfig::from_spec(&spec(), &ctx);

        assert_eq!(cfg.env.get("GEMINI_API_KEY"), Some("from-launch"));
        assert_eq!(cfg.env.get("GEMINI_MODEL"), Some("gemini-2.0-flash"));
    }

    #[test]
    fn validate_rejects_blank_command() {
        let mut s = spec();
        s.command = "   ".into();

        let cfg = SubprocessConfig::from_spec(&s, &BuildContext::default());
        assert!(cfg.validate().is_err());
    }
}
