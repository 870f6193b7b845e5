use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tracing::trace;

use crate::event::DomainEvent;

use super::PortalEvent;

/// Delivers a [`PortalEvent`] back to the portal after a delay.
pub trait Scheduler: Send {
    fn schedule(&mut self, delay: Duration, event: PortalEvent);

    /// Requests that were accepted but never delivered.
    fn drain_pending(&mut self) -> Vec<ScheduledEvent> {
        Vec::new()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledEvent {
    pub delay: Duration,
    pub event: PortalEvent,
}

/// Sleeps on the tokio runtime, then posts into the app event channel.
pub(crate) struct TokioScheduler {
    tx: UnboundedSender<DomainEvent>,
}

impl TokioScheduler {
    pub(crate) fn new(tx: UnboundedSender<DomainEvent>) -> Self {
        Self { tx }
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&mut self, delay: Duration, event: PortalEvent) {
        trace!(?event, delay_ms = delay.as_millis() as u64, "scheduled");
        let tx = self.tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(DomainEvent::Portal(event));
        });
    }
}

/// Records requests instead of running them. Clones share one queue, so a
/// test can keep a handle after boxing the scheduler into the portal.
#[derive(Debug, Clone, Default)]
pub struct ManualScheduler {
    queue: Arc<Mutex<VecDeque<ScheduledEvent>>>,
}

impl ManualScheduler {
    pub fn take_all(&self) -> Vec<ScheduledEvent> {
        self.queue
            .lock()
            .map(|mut queue| queue.drain(..).collect())
            .unwrap_or_default()
    }

    pub fn pending(&self) -> usize {
        self.queue.lock().map(|queue| queue.len()).unwrap_or(0)
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&mut self, delay: Duration, event: PortalEvent) {
        if let Ok(mut queue) = self.queue.lock() {
            queue.push_back(ScheduledEvent { delay, event });
        }
    }

    fn drain_pending(&mut self) -> Vec<ScheduledEvent> {
        self.take_all()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{ManualScheduler, Scheduler};
    use crate::portal::PortalEvent;

    #[test]
    fn manual_scheduler_clones_share_queue() {
        let handle = ManualScheduler::default();
        let mut boxed: Box<dyn Scheduler> = Box::new(handle.clone());
        boxed.schedule(
            Duration::from_millis(500),
            PortalEvent::UploadTick {
                file_id: "abc".to_string(),
            },
        );

        assert_eq!(handle.pending(), 1);
        let drained = boxed.drain_pending();
        assert_eq!(drained.len(), 1);
        assert_eq!(drained[0].delay, Duration::from_millis(500));
        assert_eq!(handle.pending(), 0);
    }
}
