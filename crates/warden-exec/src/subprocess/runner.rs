use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use tokio::process::Command;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use warden_core::{BuildContext, Runner, RunnerError, TaskError, TaskFn, TaskRef};
use warden_model::ProcessSpec;

use crate::subprocess::{
    config::SubprocessConfig,
    output::{LogConfig, pump_lines},
    signal::terminate_child,
};

/// Runner that executes process specs as OS subprocesses.
pub struct SubprocessRunner {
    log: LogConfig,
    /// How long a canceled child gets between SIGTERM and SIGKILL.
    term_grace: Duration,
}

impl SubprocessRunner {
    /// Create a runner with default output logging and a 5s term grace.
    pub fn new() -> Self {
        Self::with_options(LogConfig::default(), Duration::from_secs(5))
    }

    /// Create a runner with explicit output and termination settings.
    pub fn with_options(log: LogConfig, term_grace: Duration) -> Self {
        Self { log, term_grace }
    }
}

impl Default for SubprocessRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl Runner for SubprocessRunner {
    fn name(&self) -> &'static str {
        "subprocess"
    }

    fn supports(&self, _spec: &ProcessSpec) -> bool {
        true
    }

    fn build_task(&self, spec: &ProcessSpec, ctx: &BuildContext) -> Result<TaskRef, RunnerError> {
        let cfg = SubprocessConfig::from_spec(spec, ctx);
        cfg.validate()
            .map_err(|e| RunnerError::InvalidSpec(e.to_string()))?;

        let table = ctx.table().clone();
        let log = self.log;
        let term_grace = self.term_grace;

        Ok(TaskFn::arc(spec.name.clone(), move |cancel: CancellationToken| {
            let cfg = cfg.clone();
            let table = table.clone();

            async move {
                trace!(
                    process = %cfg.name,
                    command = %cfg.command,
                    args = ?cfg.args,
                    cwd = ?cfg.cwd,
                    "spawning subprocess",
                );

                let mut cmd = Command::new(&cfg.command);
                cmd.args(&cfg.args);
                if let Some(cwd) = &cfg.cwd {
                    cmd.current_dir(cwd);
                }
                for kv in cfg.env.iter() {
                    cmd.env(kv.key(), kv.value());
                }
                cmd.stdout(Stdio::piped());
                cmd.stderr(Stdio::piped());
                cmd.kill_on_drop(true);

                let mut child = cmd.spawn().map_err(|e| TaskError::Fatal {
                    reason: format!("spawn failed: {e}"),
                })?;

                if let Some(pid) = child.id() {
                    table.set_pid(&cfg.name, pid);
                    debug!(process = %cfg.name, pid, "subprocess started");
                }

                // Output is always redirected; the pumps run until EOF.
                let out_pump = child
                    .stdout
                    .take()
                    .map(|s| tokio::spawn(pump_lines(cfg.name.clone(), s, !log.stdout_info, log)));
                let err_pump = child
                    .stderr
                    .take()
                    .map(|s| tokio::spawn(pump_lines(cfg.name.clone(), s, log.stderr_warn, log)));

                let result = tokio::select! {
                    status = child.wait() => match status {
                        Ok(status) => {
                            table.set_exit_code(&cfg.name, status.code());
                            classify_exit(status, &cfg)
                        }
                        Err(e) => Err(TaskError::Fatal {
                            reason: format!("wait failed: {e}"),
                        }),
                    },
                    _ = cancel.cancelled() => {
                        debug!(process = %cfg.name, "cancellation requested; terminating subprocess");
                        if let Ok(status) = terminate_child(&mut child, term_grace).await {
                            table.set_exit_code(&cfg.name, status.code());
                        }
                        Err(TaskError::Canceled)
                    }
                };

                if let Some(pump) = out_pump {
                    let _ = pump.await;
                }
                if let Some(pump) = err_pump {
                    let _ = pump.await;
                }
                result
            }
        }))
    }
}

/// Map an exit status to the task result.
fn classify_exit(status: ExitStatus, cfg: &SubprocessConfig) -> Result<(), TaskError> {
    if status.success() {
        debug!(process = %cfg.name, "subprocess exited successfully");
        return Ok(());
    }
    if !cfg.fail_on_non_zero {
        debug!(process = %cfg.name, code = ?status.code(), "non-zero exit tolerated by spec");
        return Ok(());
    }
    match status.code() {
        Some(code) => Err(TaskError::Fail {
            reason: format!("process exited with non-zero code: {code}"),
        }),
        None => Err(TaskError::Fail {
            reason: "process terminated by signal".into(),
        }),
    }
}
