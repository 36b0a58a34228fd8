use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::debug;
use tracing::info;
use tracing::trace;
use tracing::warn;

use super::MonitorWorker;
use crate::metrics::OP_PRUNE;
use crate::metrics::OP_REAP;
use crate::AlarmContext;
use crate::Entity;
use crate::LookupMode;
use crate::MessageNumber;
use crate::MessageType;
use crate::Operation;
use crate::Result;

/// What one reconciliation pass changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Done alarms deleted from the store
    pub reaped: Vec<MessageNumber>,
    /// Registrations dropped for lack of active alarms
    pub pruned: Vec<MessageType>,
    /// Types whose monitor worker was started
    pub spawned: Vec<MessageType>,
    /// Consumed cancellations and whether each removed an alarm
    pub cancellations: Vec<(MessageNumber, bool)>,
}

impl TickReport {
    pub fn is_idle(&self) -> bool {
        self.reaped.is_empty()
            && self.pruned.is_empty()
            && self.spawned.is_empty()
            && self.cancellations.is_empty()
    }
}

/// Single long-lived task reconciling the alarm store, the monitor registry
/// and the cancellation queue.
///
/// Every tick runs four phases in fixed order: reap done alarms, prune
/// registrations without active alarms, spawn workers for new
/// registrations, apply pending cancellations. Each phase takes and
/// releases its own latches; no two collections are ever locked at once.
pub struct Coordinator {
    ctx: Arc<AlarmContext>,
    workers: Vec<JoinHandle<()>>,
    // Shutdown signal
    shutdown_signal: watch::Receiver<()>,
}

impl Coordinator {
    pub fn new(
        ctx: Arc<AlarmContext>,
        shutdown_signal: watch::Receiver<()>,
    ) -> Self {
        Self {
            ctx,
            workers: Vec::new(),
            shutdown_signal,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut interval = tokio::time::interval(self.ctx.settings.coordinator_tick());
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut shutdown_signal = self.shutdown_signal.clone();
        info!(
            "[Coordinator] started, tick = {:?}",
            self.ctx.settings.coordinator_tick()
        );

        loop {
            tokio::select! {
                biased;
                // P0: shutdown received;
                _ = shutdown_signal.changed() => {
                    warn!("[Coordinator] shutdown signal received.");
                    return self.retire_workers().await;
                }

                _ = interval.tick() => {
                    let report = self.tick();
                    if report.is_idle() {
                        trace!("[Coordinator] idle tick");
                    } else {
                        debug!("[Coordinator] tick: {:?}", report);
                    }
                }
            }
        }
    }

    /// Runs one reconciliation pass.
    pub fn tick(&mut self) -> TickReport {
        let started = std::time::Instant::now();
        self.workers.retain(|handle| !handle.is_finished());

        let report = TickReport {
            reaped: self.reap_done(),
            pruned: self.prune_registrations(),
            spawned: self.spawn_workers(),
            cancellations: self.apply_cancellations(),
        };

        self.ctx.metrics.set_active_alarms(self.ctx.alarms.len());
        self.ctx.metrics.observe_tick(started.elapsed());
        report
    }

    /// Worker tasks spawned by this coordinator that have not finished yet.
    pub fn running_workers(&self) -> usize {
        self.workers
            .iter()
            .filter(|handle| !handle.is_finished())
            .count()
    }

    /// Worker handles still held, finished or not. Finished ones are
    /// dropped at the start of every tick.
    #[cfg(test)]
    pub(crate) fn tracked_workers(&self) -> usize {
        self.workers.len()
    }

    fn reap_done(&self) -> Vec<MessageNumber> {
        let reaped = self.ctx.alarms.reap_done();
        self.ctx.metrics.record_operations(OP_REAP, reaped.len());
        reaped
    }

    fn prune_registrations(&self) -> Vec<MessageType> {
        let mut pruned = Vec::new();
        for alarm_type in self.ctx.monitors.types() {
            if self.ctx.alarms.exists(alarm_type, LookupMode::ByType) == 0
                && self.ctx.monitors.remove(alarm_type)
            {
                pruned.push(alarm_type);
            }
        }
        self.ctx.metrics.record_operations(OP_PRUNE, pruned.len());
        pruned
    }

    fn spawn_workers(&mut self) -> Vec<MessageType> {
        let pending = self.ctx.monitors.unspawned();
        for alarm_type in &pending {
            let worker = MonitorWorker::new(*alarm_type, self.ctx.clone());
            self.workers.push(tokio::spawn(worker.run()));
            self.ctx.monitors.mark_spawned(*alarm_type);
            self.ctx.metrics.worker_started();

            info!("[Coordinator] monitor worker for type {} spawned", alarm_type);
            self.ctx.events.publish(
                Entity::Monitor,
                *alarm_type,
                Operation::WorkerSpawned,
                None,
            );
        }
        pending
    }

    fn apply_cancellations(&self) -> Vec<(MessageNumber, bool)> {
        let alarms = &self.ctx.alarms;
        let applied = self
            .ctx
            .cancellations
            .drain_and_apply(|number| alarms.remove(number));
        for (_, removed) in &applied {
            self.ctx.metrics.record_cancellation(*removed);
        }
        applied
    }

    /// Drops every registration so each worker exits through its regular
    /// registry check, then waits for all of them.
    ///
    /// Ingress may re-register a type after the registry is cleared, which
    /// would keep that worker alive. The registry is cleared again every
    /// monitor tick until all workers have finished.
    async fn retire_workers(&mut self) -> Result<()> {
        let handles = std::mem::take(&mut self.workers);
        let pending = futures::future::join_all(handles);
        tokio::pin!(pending);

        let results = loop {
            let retired = self.ctx.monitors.clear();
            debug!("[Coordinator] retiring monitors for types {:?}", retired);

            let tick = self.ctx.settings.monitor_tick();
            match tokio::time::timeout(tick, &mut pending).await {
                Ok(results) => break results,
                Err(_) => {
                    warn!("[Coordinator] monitor workers still running, clearing registry again")
                }
            }
        };

        for result in results {
            result?;
        }
        info!("[Coordinator] stopped");
        Ok(())
    }
}
