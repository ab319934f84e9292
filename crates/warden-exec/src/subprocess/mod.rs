//! Subprocess runner for configured child processes.
//!
//! Translates a [`warden_model::ProcessSpec`] into a supervisable task
//! that spawns the command via `tokio::process::Command`, redirects all
//! child output into structured logs and terminates it gracefully on
//! cancellation.
mod config;
mod output;
mod runner;
mod signal;

pub use output::LogConfig;
pub use runner::SubprocessRunner;

use std::sync::Arc;
use std::time::Duration;

use warden_core::RunnerRouter;

/// Register the built-in subprocess runner in the given router.
///
/// `term_grace` is the SIGTERM-to-SIGKILL window for canceled children.
pub fn register_subprocess_runner(router: &mut RunnerRouter, term_grace: Duration) {
    router.register(Arc::new(SubprocessRunner::with_options(
        LogConfig::default(),
        term_grace,
    )));
}
