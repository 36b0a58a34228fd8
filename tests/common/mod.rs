use std::sync::Arc;

use alarm_engine::AlarmConfig;
use alarm_engine::AlarmEvent;
use alarm_engine::AlarmScheduler;
use alarm_engine::ChannelSink;
use alarm_engine::Entity;
use alarm_engine::Operation;
use alarm_engine::SchedulerBuilder;
use tokio::sync::mpsc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

pub struct TestScheduler {
    pub scheduler: Arc<AlarmScheduler>,
    pub events: mpsc::UnboundedReceiver<AlarmEvent>,
    shutdown_tx: watch::Sender<()>,
    handle: Option<JoinHandle<alarm_engine::Result<()>>>,
}

impl TestScheduler {
    /// Scheduler with default one-second ticks, not yet running.
    pub fn new() -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(());
        let (sink, events) = ChannelSink::channel();
        let scheduler = SchedulerBuilder::new(AlarmConfig::default(), shutdown_rx)
            .event_sink(Arc::new(sink))
            .build()
            .expect("default config should build");

        Self {
            scheduler: Arc::new(scheduler),
            events,
            shutdown_tx,
            handle: None,
        }
    }

    pub fn start(&mut self) {
        let scheduler = self.scheduler.clone();
        self.handle = Some(tokio::spawn(async move { scheduler.run().await }));
    }

    pub async fn shutdown(mut self) {
        self.shutdown_tx.send(()).expect("coordinator should be listening");
        if let Some(handle) = self.handle.take() {
            handle
                .await
                .expect("coordinator task should not panic")
                .expect("coordinator should stop cleanly");
        }
    }

    /// Every event received so far, without waiting.
    pub fn drain(&mut self) -> Vec<AlarmEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            events.push(event);
        }
        events
    }
}

pub fn operations_for(
    events: &[AlarmEvent],
    entity: Entity,
    key: u32,
) -> Vec<Operation> {
    events
        .iter()
        .filter(|e| e.entity == entity && e.key == key)
        .map(|e| e.operation.clone())
        .collect()
}
