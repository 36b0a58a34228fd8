//! Structured event stream emitted by the alarm engine.
//!
//! Every mutation of a shared collection, every monitor display pass and
//! every worker lifecycle transition produces one [`AlarmEvent`]: which
//! entity was touched, what happened to it and, when
//! [`EventConfig::emit_snapshots`](crate::EventConfig) is set, the state of
//! the collection right after the change. Events are handed to a pluggable
//! [`EventSink`] only after the collection lock has been released.

mod sink;
pub use sink::*;

use std::sync::Arc;

use serde::Serialize;

use crate::utils::time::get_now_as_u64;
use crate::AlarmSnapshot;
use crate::MessageNumber;
use crate::MessageType;
use crate::MonitorRegistration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Entity {
    Alarm,
    Monitor,
    Cancellation,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Operation {
    /// New alarm stored
    Inserted,
    /// Existing alarm with the same number overwritten
    Replaced { previous_type: MessageType },
    /// Alarm removed by number
    Removed,
    /// Done alarm deleted by the coordinator
    Reaped,
    /// Monitor worker status line for one active alarm
    Displayed { remaining_secs: u64 },
    /// Monitor worker observed the alarm past its expiry and marked it done
    Expired,
    /// Monitor registration added
    Registered,
    /// Registration removed because no active alarm of its type remains
    Pruned,
    WorkerSpawned,
    WorkerTerminated,
    /// Cancellation request queued
    Queued,
    /// Cancellation request consumed; `removed` is false when the alarm was already gone
    Applied { removed: bool },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Snapshot {
    Alarms(Vec<AlarmSnapshot>),
    Monitors(Vec<MonitorRegistration>),
    Cancellations(Vec<MessageNumber>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlarmEvent {
    pub entity: Entity,
    /// Message number for alarms and cancellations, message type for monitors
    pub key: u32,
    pub operation: Operation,
    /// Wall clock, seconds since the Unix epoch
    pub at: u64,
    pub snapshot: Option<Snapshot>,
}

/// Shared handle through which collections, the coordinator and monitor
/// workers emit events.
#[derive(Clone)]
pub struct EventPublisher {
    sink: Arc<dyn EventSink>,
    emit_snapshots: bool,
}

impl EventPublisher {
    pub fn new(
        sink: Arc<dyn EventSink>,
        emit_snapshots: bool,
    ) -> Self {
        Self {
            sink,
            emit_snapshots,
        }
    }

    /// Whether callers should capture a snapshot while they still hold the lock.
    pub fn wants_snapshots(&self) -> bool {
        self.emit_snapshots
    }

    pub fn publish(
        &self,
        entity: Entity,
        key: u32,
        operation: Operation,
        snapshot: Option<Snapshot>,
    ) {
        self.sink.emit(AlarmEvent {
            entity,
            key,
            operation,
            at: get_now_as_u64(),
            snapshot: if self.emit_snapshots { snapshot } else { None },
        });
    }
}

impl std::fmt::Debug for EventPublisher {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("EventPublisher")
            .field("emit_snapshots", &self.emit_snapshots)
            .finish()
    }
}
