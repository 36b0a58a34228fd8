use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;
use tracing::info;

use crate::metrics::OP_CANCEL_REQUEST;
use crate::metrics::OP_INSERT;
use crate::metrics::OP_REGISTER;
use crate::metrics::OP_REPLACE;
use crate::Alarm;
use crate::AlarmContext;
use crate::Coordinator;
use crate::Error;
use crate::InsertOutcome;
use crate::LookupMode;
use crate::MessageNumber;
use crate::MessageType;
use crate::Result;

/// Result of [`AlarmScheduler::register_monitor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterOutcome {
    Accepted,
    /// No alarm of the type is active, so there is nothing to display
    RejectedNoActiveAlarm,
    AlreadyRegistered,
}

/// Result of [`AlarmScheduler::request_cancellation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelOutcome {
    Accepted,
    AlreadyPending,
    /// No active alarm carries the number
    NotFound,
}

/// Ingress facade over one alarm engine.
///
/// The three ingress operations are synchronous: each returns once the
/// affected collection has been updated. Background work (reaping, pruning,
/// spawning monitor workers, applying cancellations) happens inside
/// [`run`](Self::run).
pub struct AlarmScheduler {
    ctx: Arc<AlarmContext>,
    coordinator: Mutex<Option<Coordinator>>,
}

impl AlarmScheduler {
    pub(crate) fn new(
        ctx: Arc<AlarmContext>,
        coordinator: Coordinator,
    ) -> Self {
        Self {
            ctx,
            coordinator: Mutex::new(Some(coordinator)),
        }
    }

    /// Stores a new alarm, or replaces the one already holding `number`.
    ///
    /// The message is cut to `max_message_len` bytes. On replacement the
    /// previous alarm's type is reported: that type's monitor stops showing
    /// the number unless the new alarm has the same type.
    pub fn insert_or_replace_alarm(
        &self,
        number: MessageNumber,
        alarm_type: MessageType,
        seconds: u64,
        message: impl Into<String>,
    ) -> InsertOutcome {
        let alarm = Alarm::new(number, alarm_type, seconds, message)
            .truncated(self.ctx.settings.max_message_len);
        let outcome = self.ctx.alarms.insert_or_replace(alarm);

        match outcome {
            InsertOutcome::Inserted => {
                debug!("alarm {} (type {}) inserted", number, alarm_type);
                self.ctx.metrics.record_operation(OP_INSERT);
            }
            InsertOutcome::Replaced { previous_type } => {
                info!(
                    "alarm {} replaced, previously type {} now type {}",
                    number, previous_type, alarm_type
                );
                self.ctx.metrics.record_operation(OP_REPLACE);
            }
        }
        self.ctx.metrics.set_active_alarms(self.ctx.alarms.len());
        outcome
    }

    /// Asks for a display worker on `alarm_type`. The worker is started on
    /// the coordinator's next tick.
    pub fn register_monitor(
        &self,
        alarm_type: MessageType,
    ) -> RegisterOutcome {
        if self.ctx.alarms.exists(alarm_type, LookupMode::ByType) == 0 {
            return RegisterOutcome::RejectedNoActiveAlarm;
        }
        if self.ctx.monitors.exists(alarm_type) {
            return RegisterOutcome::AlreadyRegistered;
        }

        self.ctx.monitors.add(alarm_type);
        self.ctx.metrics.record_operation(OP_REGISTER);
        RegisterOutcome::Accepted
    }

    /// Queues removal of alarm `number`, applied on the coordinator's next
    /// tick. Only active alarms can be cancelled.
    pub fn request_cancellation(
        &self,
        number: MessageNumber,
    ) -> CancelOutcome {
        if self.ctx.alarms.exists(number, LookupMode::ByNumber) == 0 {
            return CancelOutcome::NotFound;
        }
        if self.ctx.cancellations.exists(number) {
            return CancelOutcome::AlreadyPending;
        }

        self.ctx.cancellations.add(number);
        self.ctx.metrics.record_operation(OP_CANCEL_REQUEST);
        CancelOutcome::Accepted
    }

    /// Runs the coordinator until the shutdown signal fires, then waits for
    /// every monitor worker to retire. May be called once.
    pub async fn run(&self) -> Result<()> {
        let mut coordinator = self.coordinator.lock().take().ok_or(Error::AlreadyRunning)?;
        coordinator.run().await
    }

    pub fn context(&self) -> &Arc<AlarmContext> {
        &self.ctx
    }

    /// Prometheus text exposition of the scheduler's metrics.
    pub fn metrics_text(&self) -> String {
        self.ctx.metrics.render()
    }
}
