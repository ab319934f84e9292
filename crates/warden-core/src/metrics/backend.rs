use std::sync::Arc;

/// How one attempt of a supervised task ended, for metrics labeling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskOutcome {
    Success,
    Failure,
    Canceled,
}

impl TaskOutcome {
    /// Label value for metrics backends.
    #[inline]
    pub fn as_label(&self) -> &'static str {
        match self {
            TaskOutcome::Success => "success",
            TaskOutcome::Failure => "failure",
            TaskOutcome::Canceled => "canceled",
        }
    }
}

/// Metrics collection interface for the supervision runtime.
///
/// Implementations must be cheap and non-blocking; they are called from
/// the hot path of the exec layer and the edge listener.
pub trait MetricsBackend: Send + Sync + 'static {
    /// One attempt of the named task started.
    fn record_task_started(&self, task: &str);

    /// One attempt of the named task finished.
    fn record_task_completed(&self, task: &str, outcome: TaskOutcome, duration_ms: u64);

    /// A restart was scheduled for the named task.
    fn record_restart(&self, task: &str);

    /// One proxied request finished with the given outcome label
    /// (`forwarded`, `gateway_error`, `timeout`).
    fn record_proxy_request(&self, outcome: &str);
}

/// Shared handle to a metrics backend.
pub type MetricsHandle = Arc<dyn MetricsBackend>;
