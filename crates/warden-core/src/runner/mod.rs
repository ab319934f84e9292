//! Runner abstraction: turns a [`ProcessSpec`] into a supervisable task.
//!
//! Concrete runners (subprocess execution lives in `warden-exec`) are
//! registered with the [`crate::router::RunnerRouter`].
mod context;
pub use context::BuildContext;

mod error;
pub use error::RunnerError;

use crate::task::TaskRef;
use warden_model::ProcessSpec;

/// Builder of supervisable tasks for a class of process specs.
pub trait Runner: Send + Sync {
    /// Runner name used in logs and diagnostics.
    fn name(&self) -> &'static str;

    /// Returns `true` if this runner can handle the given spec.
    fn supports(&self, spec: &ProcessSpec) -> bool;

    /// Build a concrete [`TaskRef`] for the given spec.
    ///
    /// The [`BuildContext`] carries the shared dependencies injected at
    /// router setup time (override env, state table, metrics).
    fn build_task(&self, spec: &ProcessSpec, ctx: &BuildContext) -> Result<TaskRef, RunnerError>;
}
