//! The supervisor: starts every managed task, watches terminal outcomes
//! and owns the container's foreground lifetime.
//!
//! Shutdown ordering is reverse declaration order: the edge listener is
//! declared last so it drains before child processes are terminated.
mod actor;
use actor::{Actor, ActorOutcome};

use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::{
    error::CoreError,
    event::{Event, EventBus, EventKind, Subscribe},
    metrics::{MetricsHandle, noop_metrics},
    policy::TaskPolicy,
    state::{ProcessTable, TableSubscriber},
    task::TaskRef,
};
use warden_model::{Env, ProcessSpec};

/// Supervisor settings.
#[derive(Debug, Clone)]
pub struct SupervisorConfig {
    /// Total grace for the drain-then-terminate shutdown sequence.
    pub grace: Duration,
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self {
            grace: Duration::from_secs(10),
        }
    }
}

/// A task together with its lifecycle policy, ready to be supervised.
pub struct ManagedTask {
    pub task: TaskRef,
    pub policy: TaskPolicy,
}

impl ManagedTask {
    pub fn new(task: TaskRef, policy: TaskPolicy) -> Self {
        Self { task, policy }
    }
}

/// Builder for [`Supervisor`].
pub struct SupervisorBuilder {
    cfg: SupervisorConfig,
    subscribers: Vec<Arc<dyn Subscribe>>,
    metrics: MetricsHandle,
    table: ProcessTable,
}

impl SupervisorBuilder {
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers.extend(subscribers);
        self
    }

    pub fn with_subscriber(mut self, subscriber: Arc<dyn Subscribe>) -> Self {
        self.subscribers.push(subscriber);
        self
    }

    pub fn with_metrics(mut self, metrics: MetricsHandle) -> Self {
        self.metrics = metrics;
        self
    }

    /// Share an externally created process table (the edge listener reads
    /// it for health output).
    pub fn with_table(mut self, table: ProcessTable) -> Self {
        self.table = table;
        self
    }

    pub fn build(self) -> Supervisor {
        Supervisor {
            cfg: self.cfg,
            subscribers: self.subscribers,
            metrics: self.metrics,
            table: self.table,
        }
    }
}

struct ActorHandle {
    name: String,
    cancel: CancellationToken,
    join: JoinHandle<()>,
}

/// Process supervisor: owns the process table and the event bus, runs
/// each managed task under an actor and decides the container exit.
pub struct Supervisor {
    cfg: SupervisorConfig,
    subscribers: Vec<Arc<dyn Subscribe>>,
    metrics: MetricsHandle,
    table: ProcessTable,
}

impl Supervisor {
    pub fn builder(cfg: SupervisorConfig) -> SupervisorBuilder {
        SupervisorBuilder {
            cfg,
            subscribers: Vec::new(),
            metrics: noop_metrics(),
            table: ProcessTable::new(),
        }
    }

    /// Shared process-state table.
    pub fn table(&self) -> &ProcessTable {
        &self.table
    }

    /// Startup preconditions over the configured specs.
    ///
    /// Violations abort the container before anything is spawned:
    /// - every spec passes its own validation;
    /// - process names are unique;
    /// - every `required_env` name resolves in the final (spec env plus
    ///   allow-listed overrides) environment.
    pub fn validate(specs: &[ProcessSpec], override_env: &Env) -> Result<(), CoreError> {
        let mut seen = HashSet::new();
        for spec in specs {
            spec.validate()?;
            if !seen.insert(spec.name.as_str()) {
                return Err(CoreError::DuplicateName(spec.name.clone()));
            }
            let resolved = spec.env.merged(override_env);
            for name in &spec.required_env {
                if !resolved.contains(name) {
                    return Err(CoreError::MissingEnv {
                        process: spec.name.clone(),
                        name: name.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Run every managed task to a terminal state.
    ///
    /// Returns `Ok(())` only when shutdown was clean: either every task
    /// completed on its own, or a shutdown signal arrived and all tasks
    /// stopped within the grace period. A critical task's permanent
    /// failure, or an overrun grace, is an error for the container.
    pub async fn run(&self, tasks: Vec<ManagedTask>) -> Result<(), CoreError> {
        let mut names = HashSet::new();
        for managed in &tasks {
            if !names.insert(managed.task.name().to_string()) {
                return Err(CoreError::DuplicateName(managed.task.name().to_string()));
            }
        }

        let mut subscribers: Vec<Arc<dyn Subscribe>> =
            vec![Arc::new(TableSubscriber::new(self.table.clone()))];
        subscribers.extend(self.subscribers.iter().cloned());
        let bus = EventBus::start(subscribers);
        let publisher = bus.publisher();

        let (exit_tx, mut exit_rx) = mpsc::unbounded_channel::<(String, bool, ActorOutcome)>();
        let mut handles: Vec<ActorHandle> = Vec::with_capacity(tasks.len());

        for managed in tasks {
            let cancel = CancellationToken::new();
            let name = managed.task.name().to_string();
            let critical = managed.policy.critical;
            let actor = Actor::new(
                managed.task,
                managed.policy,
                publisher.clone(),
                self.metrics.clone(),
                cancel.clone(),
            );
            let tx = exit_tx.clone();
            let exit_name = name.clone();
            let join = tokio::spawn(async move {
                let outcome = actor.run().await;
                let _ = tx.send((exit_name, critical, outcome));
            });
            handles.push(ActorHandle { name, cancel, join });
        }
        drop(exit_tx);
        info!(processes = handles.len(), "supervisor started");

        let mut failure: Option<CoreError> = None;
        let mut remaining = handles.len();

        let shutdown = shutdown_signal();
        tokio::pin!(shutdown);

        while remaining > 0 {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("shutdown signal received");
                    break;
                }
                exited = exit_rx.recv() => {
                    let Some((name, critical, outcome)) = exited else { break };
                    remaining -= 1;
                    match outcome {
                        ActorOutcome::Completed => {}
                        ActorOutcome::Exhausted { reason } => {
                            if critical {
                                failure = Some(CoreError::Exhausted { task: name, reason });
                                break;
                            }
                            warn!(process = %name, reason = %reason, "non-critical process permanently failed");
                        }
                        ActorOutcome::Dead { reason } => {
                            if critical {
                                failure = Some(CoreError::FatalTask { task: name, reason });
                                break;
                            }
                            warn!(process = %name, reason = %reason, "non-critical process died");
                        }
                    }
                }
            }
        }

        publisher.publish(Event::new(EventKind::ShutdownRequested));
        let deadline = Instant::now() + self.cfg.grace;
        let mut clean = true;

        // Reverse declaration order: drain the edge before the children.
        for handle in handles.iter_mut().rev() {
            handle.cancel.cancel();
            let left = deadline.saturating_duration_since(Instant::now());
            if tokio::time::timeout(left, &mut handle.join).await.is_err() {
                publisher.publish(Event::for_task(EventKind::GraceExceeded, &handle.name));
                handle.join.abort();
                clean = false;
            }
        }
        if clean {
            publisher.publish(Event::new(EventKind::AllStoppedWithinGrace));
        }

        drop(publisher);
        bus.close().await;

        match failure {
            Some(err) => Err(err),
            None if clean => Ok(()),
            None => Err(CoreError::GraceExceeded),
        }
    }
}

/// Resolves when the OS asks the container to stop.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};
        match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
            (Ok(mut term), Ok(mut int)) => {
                tokio::select! {
                    _ = term.recv() => {}
                    _ = int.recv() => {}
                }
            }
            _ => {
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
