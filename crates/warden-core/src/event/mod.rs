//! Supervision lifecycle events.
//!
//! Every state transition of a supervised process is published as an
//! [`Event`] and fanned out to registered subscribers (log collector,
//! state table, metrics).
mod bus;
pub use bus::{EventBus, EventPublisher, Subscribe};

/// Kind of a supervision event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// Actor spawned and registered for a process.
    TaskAdded,
    /// An attempt of the process is starting.
    TaskStarting,
    /// The process stopped (success or graceful cancel).
    TaskStopped,
    /// An attempt failed (non-fatal for the actor).
    TaskFailed,
    /// Next attempt scheduled after a delay.
    BackoffScheduled,
    /// Restart budget spent or policy forbids another attempt.
    ActorExhausted,
    /// Non-retryable failure; the process is permanently down.
    ActorDead,
    /// Supervisor began shutting down (signal or critical failure).
    ShutdownRequested,
    /// Every process stopped within the grace period.
    AllStoppedWithinGrace,
    /// A process overran the grace period and was terminated forcibly.
    GraceExceeded,
    /// A subscriber queue was full and an event was dropped for it.
    SubscriberOverflow,
}

/// Supervision event with optional structured context.
///
/// Fields are optional because not every kind carries them; subscribers
/// read what they need and fall back to defaults.
#[derive(Debug, Clone)]
pub struct Event {
    pub kind: EventKind,
    pub task: Option<String>,
    pub reason: Option<String>,
    pub attempt: Option<u32>,
    pub delay_ms: Option<u64>,
    pub exit_code: Option<i32>,
}

impl Event {
    /// Event with no task context (supervisor-level kinds).
    pub fn new(kind: EventKind) -> Self {
        Self {
            kind,
            task: None,
            reason: None,
            attempt: None,
            delay_ms: None,
            exit_code: None,
        }
    }

    /// Event attributed to a named process.
    pub fn for_task(kind: EventKind, task: impl Into<String>) -> Self {
        let mut ev = Self::new(kind);
        ev.task = Some(task.into());
        ev
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    pub fn with_attempt(mut self, attempt: u32) -> Self {
        self.attempt = Some(attempt);
        self
    }

    pub fn with_delay_ms(mut self, delay_ms: u64) -> Self {
        self.delay_ms = Some(delay_ms);
        self
    }

    pub fn with_exit_code(mut self, code: i32) -> Self {
        self.exit_code = Some(code);
        self
    }
}
