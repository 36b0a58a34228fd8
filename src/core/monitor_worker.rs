use std::sync::Arc;

use tokio::time::Instant;
use tokio::time::MissedTickBehavior;
use tracing::debug;
use tracing::info;

use crate::metrics::OP_EXPIRE;
use crate::AlarmContext;
use crate::Entity;
use crate::MessageType;
use crate::Operation;
use crate::SweepReport;

/// Display worker for one alarm type.
///
/// Each pass reports every active alarm of its type and flags the ones past
/// expiry as done; it never removes anything. The worker's only exit is its
/// registration disappearing from the [`MonitorRegistry`](crate::MonitorRegistry),
/// which it checks after every pass, so it may outlive its registration by
/// one tick.
pub struct MonitorWorker {
    alarm_type: MessageType,
    ctx: Arc<AlarmContext>,
}

impl MonitorWorker {
    pub fn new(
        alarm_type: MessageType,
        ctx: Arc<AlarmContext>,
    ) -> Self {
        Self { alarm_type, ctx }
    }

    pub async fn run(self) {
        let mut interval = tokio::time::interval(self.ctx.settings.monitor_tick());
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        debug!("[MonitorWorker:{}] running", self.alarm_type);

        loop {
            interval.tick().await;
            self.display_pass();

            if !self.ctx.monitors.exists(self.alarm_type) {
                break;
            }
        }

        info!(
            "[MonitorWorker:{}] registration gone, terminating",
            self.alarm_type
        );
        self.ctx.metrics.worker_stopped();
        self.ctx.events.publish(
            Entity::Monitor,
            self.alarm_type,
            Operation::WorkerTerminated,
            None,
        );
    }

    /// One pass over the alarm store under shared access.
    pub(crate) fn display_pass(&self) -> SweepReport {
        let report = self.ctx.alarms.sweep_type(self.alarm_type, Instant::now());

        for alarm in &report.displayed {
            self.ctx.events.publish(
                Entity::Alarm,
                alarm.number,
                Operation::Displayed {
                    remaining_secs: alarm.remaining_secs,
                },
                None,
            );
        }
        for number in &report.expired {
            debug!("[MonitorWorker:{}] alarm {} expired", self.alarm_type, number);
            self.ctx
                .events
                .publish(Entity::Alarm, *number, Operation::Expired, None);
        }
        self.ctx.metrics.record_operations(OP_EXPIRE, report.expired.len());

        report
    }
}
