use serde::Serialize;

use super::MessageType;
use crate::Entity;
use crate::EventPublisher;
use crate::Operation;
use crate::RwLatch;
use crate::Snapshot;

/// A request to keep displaying alarms of one type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonitorRegistration {
    pub alarm_type: MessageType,
    /// Whether the coordinator has started this registration's worker
    pub spawned: bool,
}

/// Per-type display worker registrations, in registration order.
///
/// Only ingress adds registrations and only the coordinator removes them or
/// marks them spawned. Admission is check-then-act across two latch
/// acquisitions (see [`crate::AlarmScheduler::register_monitor`]), so two
/// racing ingress callers can both register the same type. Pruning removes
/// every registration of a type, which cleans such duplicates up together.
#[derive(Debug)]
pub struct MonitorRegistry {
    registrations: RwLatch<Vec<MonitorRegistration>>,
    events: EventPublisher,
}

impl MonitorRegistry {
    pub fn new(events: EventPublisher) -> Self {
        Self {
            registrations: RwLatch::new("monitor_registry", Vec::new()),
            events,
        }
    }

    /// Appends an unspawned registration for `alarm_type`.
    pub fn add(
        &self,
        alarm_type: MessageType,
    ) {
        let snapshot = self.registrations.write(|regs| {
            regs.push(MonitorRegistration {
                alarm_type,
                spawned: false,
            });
            self.capture(regs)
        });
        self.events
            .publish(Entity::Monitor, alarm_type, Operation::Registered, snapshot);
    }

    pub fn exists(
        &self,
        alarm_type: MessageType,
    ) -> bool {
        self.registrations
            .read(|regs| regs.iter().any(|r| r.alarm_type == alarm_type))
    }

    /// Removes every registration of `alarm_type`. Returns `false` if there was none.
    pub fn remove(
        &self,
        alarm_type: MessageType,
    ) -> bool {
        let (removed, snapshot) = self.registrations.write(|regs| {
            let before = regs.len();
            regs.retain(|r| r.alarm_type != alarm_type);
            (regs.len() != before, self.capture(regs))
        });

        if removed {
            self.events
                .publish(Entity::Monitor, alarm_type, Operation::Pruned, snapshot);
        }
        removed
    }

    /// Flags the first unspawned registration of `alarm_type` as spawned.
    pub fn mark_spawned(
        &self,
        alarm_type: MessageType,
    ) -> bool {
        self.registrations.write(|regs| {
            match regs
                .iter_mut()
                .find(|r| r.alarm_type == alarm_type && !r.spawned)
            {
                Some(reg) => {
                    reg.spawned = true;
                    true
                }
                None => false,
            }
        })
    }

    /// Types of registrations still waiting for a worker, one entry per registration.
    pub fn unspawned(&self) -> Vec<MessageType> {
        self.registrations.read(|regs| {
            regs.iter()
                .filter(|r| !r.spawned)
                .map(|r| r.alarm_type)
                .collect()
        })
    }

    /// Distinct registered types, in first-registration order.
    pub fn types(&self) -> Vec<MessageType> {
        self.registrations.read(|regs| {
            let mut types: Vec<MessageType> = Vec::with_capacity(regs.len());
            for r in regs {
                if !types.contains(&r.alarm_type) {
                    types.push(r.alarm_type);
                }
            }
            types
        })
    }

    /// Removes all registrations, returning their distinct types. Every
    /// running worker terminates on its next registry check.
    pub fn clear(&self) -> Vec<MessageType> {
        let types = self.types();
        for alarm_type in &types {
            self.remove(*alarm_type);
        }
        types
    }

    pub fn snapshot(&self) -> Vec<MonitorRegistration> {
        self.registrations.read(|regs| regs.clone())
    }

    pub fn len(&self) -> usize {
        self.registrations.read(|regs| regs.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn capture(
        &self,
        regs: &[MonitorRegistration],
    ) -> Option<Snapshot> {
        self.events
            .wants_snapshots()
            .then(|| Snapshot::Monitors(regs.to_vec()))
    }
}
