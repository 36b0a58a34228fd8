use std::sync::Arc;

use crate::AlarmConfig;
use crate::AlarmStore;
use crate::CancellationQueue;
use crate::EventPublisher;
use crate::EventSink;
use crate::MonitorRegistry;
use crate::Result;
use crate::SchedulerConfig;
use crate::SchedulerMetrics;

/// Everything the ingress facade, the coordinator and monitor workers share.
///
/// Built once per scheduler and handed around as `Arc<AlarmContext>`.
#[derive(Debug)]
pub struct AlarmContext {
    pub alarms: AlarmStore,
    pub monitors: MonitorRegistry,
    pub cancellations: CancellationQueue,
    pub events: EventPublisher,
    pub metrics: SchedulerMetrics,
    pub settings: SchedulerConfig,
}

impl AlarmContext {
    pub fn new(
        config: &AlarmConfig,
        sink: Arc<dyn EventSink>,
    ) -> Result<Self> {
        let events = EventPublisher::new(sink, config.events.emit_snapshots);
        Ok(Self {
            alarms: AlarmStore::new(events.clone()),
            monitors: MonitorRegistry::new(events.clone()),
            cancellations: CancellationQueue::new(events.clone()),
            metrics: SchedulerMetrics::new(&config.monitoring)?,
            settings: config.scheduler.clone(),
            events,
        })
    }
}
