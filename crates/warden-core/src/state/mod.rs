//! Shared process-state table.
//!
//! The table is process-wide state owned by the supervision side: it is
//! written by the event-driven [`TableSubscriber`] plus pid/exit reports
//! from the exec layer, and read by everyone else through snapshots.
mod subscriber;
pub use subscriber::TableSubscriber;

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use warden_model::ProcName;

/// Lifecycle phase of one supervised process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessStatus {
    /// Registered, not yet started.
    Pending,
    /// An attempt is running.
    Running,
    /// Waiting out a backoff delay before the next attempt.
    BackingOff,
    /// Last attempt finished cleanly (or was gracefully canceled).
    Stopped,
    /// Last attempt failed; a retry may still follow.
    Failed,
    /// Restart budget spent or policy forbids retries; permanently down.
    Exhausted,
    /// Fatal error; permanently down.
    Dead,
}

impl ProcessStatus {
    /// Label for health output and logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            ProcessStatus::Pending => "pending",
            ProcessStatus::Running => "running",
            ProcessStatus::BackingOff => "backing-off",
            ProcessStatus::Stopped => "stopped",
            ProcessStatus::Failed => "failed",
            ProcessStatus::Exhausted => "exhausted",
            ProcessStatus::Dead => "dead",
        }
    }
}

/// Observable state of one supervised process.
///
/// There is at most one live `ProcessState` per spec name.
#[derive(Debug, Clone)]
pub struct ProcessState {
    pub status: ProcessStatus,
    /// OS pid while a child process is alive; `None` otherwise.
    pub pid: Option<u32>,
    pub last_exit_code: Option<i32>,
    /// Restarts granted so far (first start excluded).
    pub restarts: u32,
    pub last_reason: Option<String>,
}

impl Default for ProcessState {
    fn default() -> Self {
        Self {
            status: ProcessStatus::Pending,
            pid: None,
            last_exit_code: None,
            restarts: 0,
            last_reason: None,
        }
    }
}

/// Clonable handle to the process table.
#[derive(Clone, Default)]
pub struct ProcessTable {
    inner: Arc<RwLock<BTreeMap<ProcName, ProcessState>>>,
}

impl ProcessTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a process in `Pending` state, replacing any stale entry.
    pub fn register(&self, name: &str) {
        if let Ok(mut map) = self.inner.write() {
            map.insert(name.to_string(), ProcessState::default());
        }
    }

    /// Update the lifecycle status and failure reason.
    pub fn update_status(&self, name: &str, status: ProcessStatus, reason: Option<String>) {
        if let Ok(mut map) = self.inner.write() {
            let state = map.entry(name.to_string()).or_default();
            state.status = status;
            if reason.is_some() {
                state.last_reason = reason;
            }
            if status != ProcessStatus::Running {
                state.pid = None;
            }
        }
    }

    /// Count one granted restart.
    pub fn record_restart(&self, name: &str) {
        if let Ok(mut map) = self.inner.write() {
            map.entry(name.to_string()).or_default().restarts += 1;
        }
    }

    /// Record the OS pid of a freshly spawned child.
    pub fn set_pid(&self, name: &str, pid: u32) {
        if let Ok(mut map) = self.inner.write() {
            map.entry(name.to_string()).or_default().pid = Some(pid);
        }
    }

    /// Record the exit code of the last attempt (`None` for signals).
    pub fn set_exit_code(&self, name: &str, code: Option<i32>) {
        if let Ok(mut map) = self.inner.write() {
            let state = map.entry(name.to_string()).or_default();
            state.last_exit_code = code;
            state.pid = None;
        }
    }

    /// Current state of one process.
    pub fn get(&self, name: &str) -> Option<ProcessState> {
        self.inner.read().ok().and_then(|map| map.get(name).cloned())
    }

    /// Snapshot of the whole table, ordered by process name.
    pub fn snapshot(&self) -> BTreeMap<ProcName, ProcessState> {
        self.inner.read().map(|map| map.clone()).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_resets_previous_state() {
        let table = ProcessTable::new();
        table.register("backend");
        table.set_pid("backend", 42);
        table.register("backend");

        let state = table.get("backend").unwrap();
        assert_eq!(state.status, ProcessStatus::Pending);
        assert!(state.pid.is_none());
    }

    #[test]
    fn leaving_running_clears_the_pid() {
        let table = ProcessTable::new();
        table.register("backend");
        table.update_status("backend", ProcessStatus::Running, None);
        table.set_pid("backend", 42);
        assert_eq!(table.get("backend").unwrap().pid, Some(42));

        table.update_status("backend", ProcessStatus::Failed, Some("exit code 1".into()));

        let state = table.get("backend").unwrap();
        assert!(state.pid.is_none());
        assert_eq!(state.last_reason.as_deref(), Some("exit code 1"));
    }

    #[test]
    fn restarts_accumulate() {
        let table = ProcessTable::new();
        table.register("edge");
        table.record_restart("edge");
        table.record_restart("edge");
        assert_eq!(table.get("edge").unwrap().restarts, 2);
    }

    #[test]
    fn snapshot_is_ordered_by_name() {
        let table = ProcessTable::new();
        table.register("edge");
        table.register("backend");

        let names: Vec<_> = table.snapshot().into_keys().collect();
        assert_eq!(names, vec!["backend".to_string(), "edge".to_string()]);
    }
}
