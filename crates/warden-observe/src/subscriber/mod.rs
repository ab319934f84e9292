#![cfg(feature = "subscriber")]

//! Event logging subscriber for the supervision runtime.
//!
//! Maps supervision events to structured tracing logs with appropriate
//! severity levels. This is the "state transition event" stream consumed
//! by the launch environment's log collector.

use std::borrow::Borrow;

use async_trait::async_trait;
use tracing::{debug, error, info, trace, warn};

use warden_core::{Event, EventKind, Subscribe};

/// Subscriber that logs all supervision events via tracing.
///
/// Events are processed on the subscriber's own worker with structured
/// fields (process, attempt, delay, reason).
#[derive(Default)]
pub struct Subscriber;

/// Queue sized for restart storms; on overflow the event is dropped for
/// this subscriber and a `SubscriberOverflow` notice is emitted.
const SUBSCRIBER_QUEUE_CAPACITY: usize = 2048;

#[async_trait]
impl Subscribe for Subscriber {
    async fn on_event(&self, event: &Event) {
        log_event(event);
    }

    fn name(&self) -> &'static str {
        "subscriber"
    }

    fn queue_capacity(&self) -> usize {
        SUBSCRIBER_QUEUE_CAPACITY
    }
}

/// Logs an event with appropriate tracing level and structured fields.
fn log_event<E: View>(e: E) {
    let msg = message_for(e.kind());

    match e.kind() {
        // Lifecycle
        EventKind::TaskAdded => debug!(process = e.as_task(), "{msg}"),
        EventKind::TaskStarting => {
            info!(process = e.as_task(), attempt = e.attempt(), "{msg}")
        }
        EventKind::TaskStopped => trace!(process = e.as_task(), "{msg}"),
        EventKind::TaskFailed => error!(
            process = e.as_task(),
            attempt = e.attempt(),
            reason = e.as_reason(),
            "{msg}"
        ),

        // Backoff - differentiate retry vs scheduled next run
        EventKind::BackoffScheduled => {
            if e.has_reason() {
                debug!(
                    process = e.as_task(),
                    attempt = e.attempt(),
                    delay_ms = e.delay_ms(),
                    reason = e.as_reason(),
                    "retry scheduled after failure",
                );
            } else {
                debug!(
                    process = e.as_task(),
                    attempt = e.attempt(),
                    delay_ms = e.delay_ms(),
                    "next run scheduled after success",
                );
            }
        }

        // Terminal states
        EventKind::ActorExhausted => {
            error!(process = e.as_task(), reason = e.as_reason(), "{msg}")
        }
        EventKind::ActorDead => {
            error!(process = e.as_task(), reason = e.as_reason(), "{msg}")
        }

        // Shutdown
        EventKind::ShutdownRequested => info!("{msg}"),
        EventKind::AllStoppedWithinGrace => info!("{msg}"),
        EventKind::GraceExceeded => warn!(process = e.as_task(), "{msg}"),

        // Bus diagnostics
        EventKind::SubscriberOverflow => {
            error!(reason = e.as_reason(), "{msg}")
        }
    }
}

/// Helper trait for extracting event fields with sensible defaults.
trait View {
    fn as_task(&self) -> &str;
    fn as_reason(&self) -> &str;
    fn attempt(&self) -> u32;
    fn delay_ms(&self) -> u64;
    fn kind(&self) -> EventKind;
    fn has_reason(&self) -> bool;
}

impl<T> View for T
where
    T: Borrow<Event>,
{
    #[inline]
    fn as_task(&self) -> &str {
        self.borrow().task.as_deref().unwrap_or("unknown")
    }

    #[inline]
    fn as_reason(&self) -> &str {
        self.borrow().reason.as_deref().unwrap_or("unknown")
    }

    #[inline]
    fn attempt(&self) -> u32 {
        self.borrow().attempt.unwrap_or(0)
    }

    #[inline]
    fn delay_ms(&self) -> u64 {
        self.borrow().delay_ms.unwrap_or(0)
    }

    #[inline]
    fn kind(&self) -> EventKind {
        self.borrow().kind
    }

    #[inline]
    fn has_reason(&self) -> bool {
        self.borrow().reason.is_some()
    }
}

/// Returns a human-readable description for each event kind.
#[inline]
fn message_for(kind: EventKind) -> &'static str {
    match kind {
        // Lifecycle
        EventKind::TaskAdded => "process registered (actor spawned)",
        EventKind::TaskStarting => "process is starting",
        EventKind::TaskStopped => "process stopped (success or graceful cancel)",
        EventKind::TaskFailed => "process failed (non-fatal for this attempt)",
        EventKind::BackoffScheduled => "next attempt scheduled",

        // Terminal
        EventKind::ActorExhausted => "process exhausted its restart budget (no further restarts)",
        EventKind::ActorDead => "process terminated permanently (fatal)",

        // Shutdown
        EventKind::ShutdownRequested => "shutdown requested",
        EventKind::AllStoppedWithinGrace => "all processes stopped within grace period",
        EventKind::GraceExceeded => "grace exceeded; process terminated forcibly",

        // Bus diagnostics
        EventKind::SubscriberOverflow => "event dropped for a subscriber (queue full)",
    }
}
