use std::fmt;

use crate::metrics::MetricsHandle;
use crate::state::ProcessTable;
use warden_model::Env;

/// Shared build context passed to all runners.
///
/// Carries the launch-time override environment (already filtered by the
/// allow-list), the process-state table and the metrics backend.
#[derive(Clone)]
pub struct BuildContext {
    override_env: Env,
    table: ProcessTable,
    metrics: MetricsHandle,
}

impl BuildContext {
    /// Create a context with the given parts.
    pub fn new(override_env: Env, table: ProcessTable, metrics: MetricsHandle) -> Self {
        Self {
            override_env,
            table,
            metrics,
        }
    }

    /// Allow-listed launch overrides, applied on top of spec env.
    pub fn override_env(&self) -> &Env {
        &self.override_env
    }

    /// Shared process-state table.
    pub fn table(&self) -> &ProcessTable {
        &self.table
    }

    /// Clonable handle to the metrics backend.
    pub fn metrics(&self) -> &MetricsHandle {
        &self.metrics
    }

    /// Replace the override environment.
    pub fn with_override_env(mut self, env: Env) -> Self {
        self.override_env = env;
        self
    }

    /// Replace the metrics backend.
    pub fn with_metrics(mut self, metrics: MetricsHandle) -> Self {
        self.metrics = metrics;
        self
    }
}

impl Default for BuildContext {
    fn default() -> Self {
        Self {
            override_env: Env::default(),
            table: ProcessTable::new(),
            metrics: crate::metrics::noop_metrics(),
        }
    }
}

impl fmt::Debug for BuildContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuildContext")
            .field("override_env_len", &self.override_env.len())
            .field("metrics", &"<handle>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::BuildContext;
    use warden_model::Env;

    #[test]
    fn default_context_is_empty() {
        let ctx = BuildContext::default();
        assert_eq!(ctx.override_env().len(), 0);
        assert!(ctx.table().snapshot().is_empty());
    }

    #[test]
    fn with_override_env_replaces_the_overrides() {
        let mut env = Env::new();
        env.push("GEMINI_API_KEY", "from-launch");

        let ctx = BuildContext::default().with_override_env(env);
        assert_eq!(ctx.override_env().get("GEMINI_API_KEY"), Some("from-launch"));
    }
}
