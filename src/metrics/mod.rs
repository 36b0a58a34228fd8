//! Prometheus metrics for the alarm engine.
//!
//! Each scheduler owns its own [`Registry`] so that several engines (or
//! tests) in one process never share counters.


use std::time::Duration;

use prometheus::exponential_buckets;
use prometheus::Encoder;
use prometheus::Histogram;
use prometheus::HistogramOpts;
use prometheus::IntCounterVec;
use prometheus::IntGauge;
use prometheus::Opts;
use prometheus::Registry;
use prometheus::TextEncoder;
use tracing::warn;

use crate::MonitoringConfig;
use crate::Result;

pub(crate) const OP_INSERT: &str = "insert";
pub(crate) const OP_REPLACE: &str = "replace";
pub(crate) const OP_REAP: &str = "reap";
pub(crate) const OP_EXPIRE: &str = "expire";
pub(crate) const OP_REGISTER: &str = "register";
pub(crate) const OP_PRUNE: &str = "prune";
pub(crate) const OP_CANCEL_REQUEST: &str = "cancel_request";

pub struct SchedulerMetrics {
    enabled: bool,
    registry: Registry,
    alarms_active: IntGauge,
    alarm_operations: IntCounterVec,
    monitor_workers: IntGauge,
    cancellations_applied: IntCounterVec,
    tick_duration: Histogram,
}

impl SchedulerMetrics {
    pub fn new(config: &MonitoringConfig) -> Result<Self> {
        // The namespace is only validated when metrics are enabled
        let registry = if config.metrics_enabled {
            Registry::new_custom(Some(config.metrics_namespace.clone()), None)?
        } else {
            Registry::new()
        };

        let alarms_active = IntGauge::new("alarms_active", "Alarms currently held in the store")?;
        let alarm_operations = IntCounterVec::new(
            Opts::new("alarm_operations_total", "Alarm store mutations by operation"),
            &["operation"],
        )?;
        let monitor_workers = IntGauge::new(
            "monitor_workers_running",
            "Monitor workers currently running",
        )?;
        let cancellations_applied = IntCounterVec::new(
            Opts::new(
                "cancellations_applied_total",
                "Cancellation requests consumed by the coordinator",
            ),
            &["result"],
        )?;
        let tick_duration = Histogram::with_opts(
            HistogramOpts::new(
                "coordinator_tick_duration_seconds",
                "Wall time of one coordinator reconciliation pass",
            )
            .buckets(exponential_buckets(0.000_01, 4.0, 10)?),
        )?;

        if config.metrics_enabled {
            registry.register(Box::new(alarms_active.clone()))?;
            registry.register(Box::new(alarm_operations.clone()))?;
            registry.register(Box::new(monitor_workers.clone()))?;
            registry.register(Box::new(cancellations_applied.clone()))?;
            registry.register(Box::new(tick_duration.clone()))?;
        }

        Ok(Self {
            enabled: config.metrics_enabled,
            registry,
            alarms_active,
            alarm_operations,
            monitor_workers,
            cancellations_applied,
            tick_duration,
        })
    }

    pub fn set_active_alarms(
        &self,
        count: usize,
    ) {
        self.alarms_active.set(count as i64);
    }

    pub fn record_operation(
        &self,
        operation: &str,
    ) {
        self.alarm_operations.with_label_values(&[operation]).inc();
    }

    pub fn record_operations(
        &self,
        operation: &str,
        count: usize,
    ) {
        if count > 0 {
            self.alarm_operations
                .with_label_values(&[operation])
                .inc_by(count as u64);
        }
    }

    pub fn worker_started(&self) {
        self.monitor_workers.inc();
    }

    pub fn worker_stopped(&self) {
        self.monitor_workers.dec();
    }

    pub fn record_cancellation(
        &self,
        removed: bool,
    ) {
        let result = if removed { "removed" } else { "missed" };
        self.cancellations_applied.with_label_values(&[result]).inc();
    }

    pub fn observe_tick(
        &self,
        elapsed: Duration,
    ) {
        self.tick_duration.observe(elapsed.as_secs_f64());
    }

    pub fn operation_count(
        &self,
        operation: &str,
    ) -> u64 {
        self.alarm_operations.with_label_values(&[operation]).get()
    }

    pub fn running_workers(&self) -> i64 {
        self.monitor_workers.get()
    }

    pub fn active_alarms(&self) -> i64 {
        self.alarms_active.get()
    }

    /// Prometheus text exposition of every registered metric. Empty when
    /// metrics are disabled.
    pub fn render(&self) -> String {
        if !self.enabled {
            return String::new();
        }
        let mut buffer = Vec::new();
        if let Err(e) = TextEncoder::new().encode(&self.registry.gather(), &mut buffer) {
            warn!("failed to encode metrics: {:?}", e);
            return String::new();
        }
        String::from_utf8_lossy(&buffer).into_owned()
    }
}

impl std::fmt::Debug for SchedulerMetrics {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("SchedulerMetrics")
            .field("enabled", &self.enabled)
            .finish()
    }
}
