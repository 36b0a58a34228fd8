#[cfg(test)]
use mockall::automock;
use tokio::sync::mpsc;
use tracing::debug;
use tracing::info;
use tracing::trace;

use super::AlarmEvent;
use super::Operation;

/// Destination for the engine's structured event stream.
///
/// `emit` is called from ingress callers, the coordinator and monitor
/// workers, never while a collection lock is held, so an implementation may
/// read back through the engine without deadlocking. It must not block for
/// long: the calling loop waits for it.
#[cfg_attr(test, automock)]
pub trait EventSink: Send + Sync + 'static {
    fn emit(
        &self,
        event: AlarmEvent,
    );
}

/// Default sink: writes each event as structured `tracing` fields.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(
        &self,
        event: AlarmEvent,
    ) {
        match event.operation {
            Operation::Displayed { remaining_secs } => trace!(
                entity = ?event.entity,
                key = event.key,
                remaining_secs,
                at = event.at,
                "alarm displayed"
            ),
            Operation::WorkerSpawned | Operation::WorkerTerminated => info!(
                entity = ?event.entity,
                key = event.key,
                operation = ?event.operation,
                at = event.at,
                "monitor worker lifecycle"
            ),
            _ => debug!(
                entity = ?event.entity,
                key = event.key,
                operation = ?event.operation,
                at = event.at,
                snapshot = ?event.snapshot,
                "alarm event"
            ),
        }
    }
}

/// Forwards events to an unbounded channel for an in-process observer.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<AlarmEvent>,
}

impl ChannelSink {
    /// Sink plus the receiving end its events are forwarded to.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<AlarmEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl EventSink for ChannelSink {
    fn emit(
        &self,
        event: AlarmEvent,
    ) {
        if self.tx.send(event).is_err() {
            trace!("event observer dropped, discarding event");
        }
    }
}
