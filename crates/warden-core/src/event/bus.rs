use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::warn;

use super::{Event, EventKind};

/// Consumer of supervision events.
///
/// Each subscriber gets its own bounded queue and worker; a slow
/// subscriber drops events for itself only and never blocks the
/// supervision loop.
#[async_trait]
pub trait Subscribe: Send + Sync {
    /// Handle one event. Called from the subscriber's own worker task.
    async fn on_event(&self, event: &Event);

    /// Subscriber name used in diagnostics.
    fn name(&self) -> &'static str;

    /// Capacity of the subscriber's event queue.
    fn queue_capacity(&self) -> usize {
        1024
    }
}

struct Output {
    name: &'static str,
    tx: mpsc::Sender<Event>,
}

/// Clonable publishing side of the bus, handed to actors.
#[derive(Clone)]
pub struct EventPublisher {
    outputs: Arc<Vec<Output>>,
}

impl EventPublisher {
    /// Fan an event out to every subscriber queue without blocking.
    ///
    /// A full queue drops the event for that subscriber and announces the
    /// drop with a best-effort [`EventKind::SubscriberOverflow`].
    pub fn publish(&self, event: Event) {
        let mut overflowed: Vec<&'static str> = Vec::new();

        for out in self.outputs.iter() {
            if let Err(mpsc::error::TrySendError::Full(_)) = out.tx.try_send(event.clone()) {
                warn!(subscriber = out.name, kind = ?event.kind, "subscriber queue full; event dropped");
                overflowed.push(out.name);
            }
        }

        // Overflow notices are themselves best-effort and never cascade.
        if event.kind != EventKind::SubscriberOverflow {
            for name in overflowed {
                let notice = Event::new(EventKind::SubscriberOverflow)
                    .with_reason(format!("queue full for subscriber '{name}'"));
                for out in self.outputs.iter() {
                    let _ = out.tx.try_send(notice.clone());
                }
            }
        }
    }
}

/// Event fan-out hub: one bounded queue and worker per subscriber.
pub struct EventBus {
    publisher: EventPublisher,
    workers: Vec<JoinHandle<()>>,
}

impl EventBus {
    /// Spawn a worker per subscriber and return the assembled bus.
    pub fn start(subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        let mut outputs = Vec::with_capacity(subscribers.len());
        let mut workers = Vec::with_capacity(subscribers.len());

        for sub in subscribers {
            let (tx, mut rx) = mpsc::channel::<Event>(sub.queue_capacity().max(1));
            outputs.push(Output {
                name: sub.name(),
                tx,
            });
            workers.push(tokio::spawn(async move {
                while let Some(event) = rx.recv().await {
                    sub.on_event(&event).await;
                }
            }));
        }

        Self {
            publisher: EventPublisher {
                outputs: Arc::new(outputs),
            },
            workers,
        }
    }

    /// Get a clonable publishing handle.
    pub fn publisher(&self) -> EventPublisher {
        self.publisher.clone()
    }

    /// Drop the queues and wait for workers to drain.
    ///
    /// Outstanding [`EventPublisher`] clones keep their queues open; close
    /// after the actors holding them have finished.
    pub async fn close(self) {
        drop(self.publisher);
        for worker in self.workers {
            let _ = worker.await;
        }
    }
}
