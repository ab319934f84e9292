use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;

use crate::{
    event::{Event, EventKind, EventPublisher},
    metrics::{MetricsHandle, TaskOutcome},
    policy::{RestartWindow, TaskPolicy},
    task::{TaskError, TaskRef},
};

/// Terminal result of one actor.
#[derive(Debug)]
pub(crate) enum ActorOutcome {
    /// The task finished or was canceled; nothing left to do.
    Completed,
    /// Restart budget spent or policy forbids another attempt.
    Exhausted { reason: String },
    /// Non-retryable failure.
    Dead { reason: String },
}

/// Drives one supervised task: runs attempts, classifies exits, applies
/// the restart decision and waits out backoff delays.
pub(crate) struct Actor {
    name: String,
    task: TaskRef,
    policy: TaskPolicy,
    events: EventPublisher,
    metrics: MetricsHandle,
    cancel: CancellationToken,
}

impl Actor {
    pub(crate) fn new(
        task: TaskRef,
        policy: TaskPolicy,
        events: EventPublisher,
        metrics: MetricsHandle,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            name: task.name().to_string(),
            task,
            policy,
            events,
            metrics,
            cancel,
        }
    }

    pub(crate) async fn run(self) -> ActorOutcome {
        self.events
            .publish(Event::for_task(EventKind::TaskAdded, &self.name));

        let mut window = RestartWindow::new(self.policy.budget);
        // Consecutive failures since the last success; drives backoff growth.
        let mut failures: u32 = 0;
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;
            self.events.publish(
                Event::for_task(EventKind::TaskStarting, &self.name).with_attempt(attempt),
            );
            self.metrics.record_task_started(&self.name);

            let started = Instant::now();
            let result = self.task.run(self.cancel.clone()).await;
            let elapsed_ms = started.elapsed().as_millis() as u64;

            match result {
                Ok(()) => {
                    self.metrics
                        .record_task_completed(&self.name, TaskOutcome::Success, elapsed_ms);
                    self.events
                        .publish(Event::for_task(EventKind::TaskStopped, &self.name));
                    failures = 0;

                    if self.cancel.is_cancelled() || !self.policy.restart.allows_restart(false) {
                        return ActorOutcome::Completed;
                    }
                    let delay = self.policy.backoff.success_delay.unwrap_or(Duration::ZERO);
                    self.events.publish(
                        Event::for_task(EventKind::BackoffScheduled, &self.name)
                            .with_attempt(attempt)
                            .with_delay_ms(delay.as_millis() as u64),
                    );
                    self.metrics.record_restart(&self.name);
                    if !self.sleep_through(delay).await {
                        return ActorOutcome::Completed;
                    }
                }
                Err(TaskError::Canceled) => {
                    self.metrics
                        .record_task_completed(&self.name, TaskOutcome::Canceled, elapsed_ms);
                    self.events
                        .publish(Event::for_task(EventKind::TaskStopped, &self.name));
                    return ActorOutcome::Completed;
                }
                Err(TaskError::Fatal { reason }) => {
                    self.metrics
                        .record_task_completed(&self.name, TaskOutcome::Failure, elapsed_ms);
                    self.events.publish(
                        Event::for_task(EventKind::ActorDead, &self.name)
                            .with_reason(reason.clone()),
                    );
                    return ActorOutcome::Dead { reason };
                }
                Err(TaskError::Fail { reason }) => {
                    self.metrics
                        .record_task_completed(&self.name, TaskOutcome::Failure, elapsed_ms);
                    failures += 1;
                    self.events.publish(
                        Event::for_task(EventKind::TaskFailed, &self.name)
                            .with_attempt(attempt)
                            .with_reason(reason.clone()),
                    );

                    if self.cancel.is_cancelled() {
                        return ActorOutcome::Completed;
                    }
                    if !self.policy.restart.allows_restart(true) {
                        let reason = format!("restart disabled by policy after: {reason}");
                        self.events.publish(
                            Event::for_task(EventKind::ActorExhausted, &self.name)
                                .with_reason(reason.clone()),
                        );
                        return ActorOutcome::Exhausted { reason };
                    }
                    if !window.try_acquire(Instant::now()) {
                        let reason = format!(
                            "{} restarts within {}ms",
                            window.used(),
                            window.policy().window.as_millis()
                        );
                        self.events.publish(
                            Event::for_task(EventKind::ActorExhausted, &self.name)
                                .with_reason(reason.clone()),
                        );
                        return ActorOutcome::Exhausted { reason };
                    }

                    let delay = self.policy.backoff.delay(failures);
                    self.events.publish(
                        Event::for_task(EventKind::BackoffScheduled, &self.name)
                            .with_attempt(attempt)
                            .with_delay_ms(delay.as_millis() as u64)
                            .with_reason(reason),
                    );
                    self.metrics.record_restart(&self.name);
                    if !self.sleep_through(delay).await {
                        return ActorOutcome::Completed;
                    }
                }
            }
        }
    }

    /// Wait out a delay; returns `false` if canceled first.
    async fn sleep_through(&self, delay: Duration) -> bool {
        tokio::select! {
            _ = tokio::time::sleep(delay) => true,
            _ = self.cancel.cancelled() => false,
        }
    }
}
