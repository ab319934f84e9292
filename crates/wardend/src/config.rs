use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use warden_edge::EdgeConfig;
use warden_model::{AllowList, Env, ProcessSpec, TimeoutMs};
use warden_observe::LoggerConfig;

/// Supervisor-level settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SupervisorSettings {
    /// Total drain-then-terminate grace on shutdown.
    pub grace_ms: TimeoutMs,
    /// SIGTERM-to-SIGKILL window for individual children.
    pub term_grace_ms: TimeoutMs,
}

impl Default for SupervisorSettings {
    fn default() -> Self {
        Self {
            grace_ms: 10_000,
            term_grace_ms: 5_000,
        }
    }
}

/// The configuration resource named on the command line.
///
/// Every section has defaults, so a minimal deployment only lists its
/// child processes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AgentConfig {
    pub logger: LoggerConfig,
    pub supervisor: SupervisorSettings,
    /// Env names the launch environment may override; everything else
    /// keeps its image-baked default.
    pub allow_env_override: AllowList,
    pub edge: EdgeConfig,
    /// Child processes in start order; shutdown runs in reverse.
    pub processes: Vec<ProcessSpec>,
}

impl AgentConfig {
    /// Load and parse the configuration file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let cfg: AgentConfig = serde_json::from_str(&raw)
            .with_context(|| format!("parsing config {}", path.display()))?;
        Ok(cfg)
    }

    /// Capture the allow-listed part of the ambient environment.
    ///
    /// This is the only point where the launch environment reaches the
    /// processes; names off the list are never read.
    pub fn capture_overrides(&self) -> Env {
        let mut out = Env::new();
        for name in self.allow_env_override.names() {
            if let Ok(value) = std::env::var(name) {
                out.push(name, value);
            }
        }
        out
    }
}
