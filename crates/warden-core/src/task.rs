//! Cancellable unit of supervised work.
//!
//! A [`TaskFn`] wraps an async closure that receives a cancellation token
//! and runs until it finishes, fails, or observes the token. The supervisor
//! never inspects what the closure does; it only classifies the result.
use std::{fmt, future::Future, pin::Pin, sync::Arc};

use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// How a single task attempt ended, beyond plain success.
#[derive(Debug, Error)]
pub enum TaskError {
    /// Retryable failure; the restart policy decides what happens next.
    #[error("task failed: {reason}")]
    Fail { reason: String },

    /// Non-retryable failure (bind conflict, spawn error). The actor
    /// reports the task dead immediately instead of scheduling a retry.
    #[error("fatal task error: {reason}")]
    Fatal { reason: String },

    /// The attempt observed its cancellation token and stopped.
    #[error("task canceled")]
    Canceled,
}

/// Boxed future produced by one task attempt.
pub type TaskFuture = Pin<Box<dyn Future<Output = Result<(), TaskError>> + Send>>;

type TaskBody = dyn Fn(CancellationToken) -> TaskFuture + Send + Sync;

/// Named, repeatable task body.
///
/// The closure is invoked once per attempt; restarts call it again with a
/// fresh future but the same cancellation token lineage.
pub struct TaskFn {
    name: String,
    body: Box<TaskBody>,
}

/// Shared reference to a task, cloned into the actor that drives it.
pub type TaskRef = Arc<TaskFn>;

impl TaskFn {
    /// Wrap an async closure into a shareable task reference.
    pub fn arc<F, Fut>(name: impl Into<String>, f: F) -> TaskRef
    where
        F: Fn(CancellationToken) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), TaskError>> + Send + 'static,
    {
        Arc::new(Self {
            name: name.into(),
            body: Box::new(move |cancel| Box::pin(f(cancel))),
        })
    }

    /// Task name used in logs, events and the state table.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Start one attempt of the task.
    pub fn run(&self, cancel: CancellationToken) -> TaskFuture {
        (self.body)(cancel)
    }
}

impl fmt::Debug for TaskFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskFn").field("name", &self.name).finish()
    }
}
