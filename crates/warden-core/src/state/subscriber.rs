use async_trait::async_trait;
use tracing::trace;

use super::{ProcessStatus, ProcessTable};
use crate::event::{Event, EventKind, Subscribe};

/// Subscriber that projects supervision events into the process table.
///
/// The supervisor registers it automatically, so the table always tracks
/// the event stream and never needs direct writes from actors.
pub struct TableSubscriber {
    table: ProcessTable,
}

impl TableSubscriber {
    pub fn new(table: ProcessTable) -> Self {
        Self { table }
    }
}

#[async_trait]
impl Subscribe for TableSubscriber {
    async fn on_event(&self, event: &Event) {
        let Some(name) = event.task.as_deref() else {
            return;
        };

        match event.kind {
            EventKind::TaskAdded => {
                self.table.register(name);
            }
            EventKind::TaskStarting => {
                trace!(process = name, "table: running");
                self.table.update_status(name, ProcessStatus::Running, None);
            }
            EventKind::TaskStopped => {
                self.table.update_status(name, ProcessStatus::Stopped, None);
            }
            EventKind::TaskFailed => {
                self.table
                    .update_status(name, ProcessStatus::Failed, event.reason.clone());
                if event.exit_code.is_some() {
                    self.table.set_exit_code(name, event.exit_code);
                }
            }
            EventKind::BackoffScheduled => {
                self.table
                    .update_status(name, ProcessStatus::BackingOff, None);
                self.table.record_restart(name);
            }
            EventKind::ActorExhausted => {
                self.table
                    .update_status(name, ProcessStatus::Exhausted, event.reason.clone());
            }
            EventKind::ActorDead => {
                self.table
                    .update_status(name, ProcessStatus::Dead, event.reason.clone());
            }
            _ => {}
        }
    }

    fn name(&self) -> &'static str {
        "state-table"
    }

    fn queue_capacity(&self) -> usize {
        2048
    }
}
