//! Shared fixtures for unit tests.
use std::sync::Arc;

use tokio::sync::mpsc;

use crate::AlarmConfig;
use crate::AlarmContext;
use crate::AlarmEvent;
use crate::ChannelSink;
use crate::EventPublisher;

/// Publisher whose events land in the returned receiver.
pub(crate) fn channel_publisher(
    emit_snapshots: bool
) -> (EventPublisher, mpsc::UnboundedReceiver<AlarmEvent>) {
    let (sink, rx) = ChannelSink::channel();
    (EventPublisher::new(Arc::new(sink), emit_snapshots), rx)
}

/// Default config with millisecond-scale ticks for tests that run on real time.
pub(crate) fn fast_config() -> AlarmConfig {
    let mut config = AlarmConfig::default();
    config.scheduler.coordinator_tick_in_ms = 10;
    config.scheduler.monitor_tick_in_ms = 10;
    config
}

/// Context built from `config` whose events land in the returned receiver.
pub(crate) fn channel_context(
    config: &AlarmConfig
) -> (Arc<AlarmContext>, mpsc::UnboundedReceiver<AlarmEvent>) {
    let (sink, rx) = ChannelSink::channel();
    let ctx = AlarmContext::new(config, Arc::new(sink)).expect("context should build");
    (Arc::new(ctx), rx)
}

/// Everything received so far, without waiting.
pub(crate) fn drain_events(rx: &mut mpsc::UnboundedReceiver<AlarmEvent>) -> Vec<AlarmEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}
