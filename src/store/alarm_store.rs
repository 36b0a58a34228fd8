use tokio::time::Instant;
use tracing::debug;

use super::Alarm;
use super::AlarmSnapshot;
use super::LookupMode;
use super::MessageNumber;
use super::MessageType;
use crate::Entity;
use crate::EventPublisher;
use crate::Operation;
use crate::RwLatch;
use crate::Snapshot;

/// Result of [`AlarmStore::insert_or_replace`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    /// An alarm with the same number existed and was discarded.
    /// `previous_type` is the type it was displayed under.
    Replaced { previous_type: MessageType },
}

/// Result of one monitor worker pass over its type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Active alarms of the type whose expiry has not passed yet
    pub displayed: Vec<AlarmSnapshot>,
    /// Alarms this pass flagged as done
    pub expired: Vec<MessageNumber>,
}

/// Alarms ordered by ascending message number, at most one per number.
#[derive(Debug)]
pub struct AlarmStore {
    alarms: RwLatch<Vec<Alarm>>,
    events: EventPublisher,
}

impl AlarmStore {
    pub fn new(events: EventPublisher) -> Self {
        Self {
            alarms: RwLatch::new("alarm_store", Vec::new()),
            events,
        }
    }

    /// Stores `alarm` at its sorted position, replacing any alarm with the
    /// same number in place.
    pub fn insert_or_replace(
        &self,
        alarm: Alarm,
    ) -> InsertOutcome {
        let number = alarm.number;
        let (outcome, snapshot) = self.alarms.write(|alarms| {
            let outcome = match alarms.binary_search_by_key(&number, |a| a.number) {
                Ok(pos) => {
                    let previous = std::mem::replace(&mut alarms[pos], alarm);
                    InsertOutcome::Replaced {
                        previous_type: previous.alarm_type,
                    }
                }
                Err(pos) => {
                    alarms.insert(pos, alarm);
                    InsertOutcome::Inserted
                }
            };
            debug_assert!(alarms.windows(2).all(|w| w[0].number < w[1].number));
            (outcome, self.capture(alarms))
        });

        let operation = match outcome {
            InsertOutcome::Inserted => Operation::Inserted,
            InsertOutcome::Replaced { previous_type } => Operation::Replaced { previous_type },
        };
        self.events.publish(Entity::Alarm, number, operation, snapshot);
        outcome
    }

    /// Removes the alarm with `number`. Idempotent: returns `false` if no
    /// such alarm is stored.
    pub fn remove(
        &self,
        number: MessageNumber,
    ) -> bool {
        let (found, snapshot) = self.alarms.write(|alarms| {
            match alarms.binary_search_by_key(&number, |a| a.number) {
                Ok(pos) => {
                    alarms.remove(pos);
                    (true, self.capture(alarms))
                }
                Err(_) => (false, None),
            }
        });

        if found {
            self.events.publish(Entity::Alarm, number, Operation::Removed, snapshot);
        }
        found
    }

    /// Counts active (not done) alarms matching `key` under `mode`.
    pub fn exists(
        &self,
        key: u32,
        mode: LookupMode,
    ) -> usize {
        self.alarms.read(|alarms| {
            alarms
                .iter()
                .filter(|a| a.is_active())
                .filter(|a| match mode {
                    LookupMode::ByType => a.alarm_type == key,
                    LookupMode::ByNumber => a.number == key,
                })
                .count()
        })
    }

    /// Deletes every alarm flagged done and returns their numbers.
    ///
    /// A shared pass checks for done alarms first so the common case never
    /// takes the exclusive latch. The exclusive pass re-checks the flag
    /// rather than removing by number: between the two passes an ingress
    /// caller may have replaced a done alarm with a fresh one under the same
    /// number, and that replacement must survive.
    pub fn reap_done(&self) -> Vec<MessageNumber> {
        if !self.alarms.read(|alarms| alarms.iter().any(Alarm::is_done)) {
            return Vec::new();
        }

        let (reaped, snapshot) = self.alarms.write(|alarms| {
            let mut reaped = Vec::new();
            alarms.retain(|a| {
                if a.is_done() {
                    reaped.push(a.number);
                    false
                } else {
                    true
                }
            });
            (reaped, self.capture(alarms))
        });

        debug!("reaped done alarms: {:?}", reaped);
        for number in &reaped {
            self.events
                .publish(Entity::Alarm, *number, Operation::Reaped, snapshot.clone());
        }
        reaped
    }

    /// One monitor pass over the active alarms of `alarm_type`, under shared
    /// access: alarms whose expiry has not passed at `now` are reported,
    /// the rest are flagged done.
    pub fn sweep_type(
        &self,
        alarm_type: MessageType,
        now: Instant,
    ) -> SweepReport {
        self.alarms.read(|alarms| {
            let mut report = SweepReport::default();
            for alarm in alarms
                .iter()
                .filter(|a| a.alarm_type == alarm_type && a.is_active())
            {
                if !alarm.is_expired_at(now) {
                    report.displayed.push(alarm.snapshot(now));
                } else if alarm.mark_done() {
                    report.expired.push(alarm.number);
                }
            }
            report
        })
    }

    pub fn get(
        &self,
        number: MessageNumber,
    ) -> Option<AlarmSnapshot> {
        let now = Instant::now();
        self.alarms.read(|alarms| {
            alarms
                .binary_search_by_key(&number, |a| a.number)
                .ok()
                .map(|pos| alarms[pos].snapshot(now))
        })
    }

    pub fn snapshot(&self) -> Vec<AlarmSnapshot> {
        let now = Instant::now();
        self.alarms.read(|alarms| snapshot_of(alarms, now))
    }

    pub fn len(&self) -> usize {
        self.alarms.read(|alarms| alarms.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn capture(
        &self,
        alarms: &[Alarm],
    ) -> Option<Snapshot> {
        self.events
            .wants_snapshots()
            .then(|| Snapshot::Alarms(snapshot_of(alarms, Instant::now())))
    }
}

fn snapshot_of(
    alarms: &[Alarm],
    now: Instant,
) -> Vec<AlarmSnapshot> {
    alarms.iter().map(|a| a.snapshot(now)).collect()
}
