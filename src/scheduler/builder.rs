use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;

use crate::AlarmConfig;
use crate::AlarmContext;
use crate::AlarmScheduler;
use crate::Coordinator;
use crate::EventSink;
use crate::Result;
use crate::TracingSink;

/// Assembles an [`AlarmScheduler`] from a configuration, a shutdown signal
/// and an optional event sink. Without an explicit sink, events go to
/// [`TracingSink`].
pub struct SchedulerBuilder {
    config: AlarmConfig,
    event_sink: Option<Arc<dyn EventSink>>,
    shutdown_signal: watch::Receiver<()>,
}

impl SchedulerBuilder {
    pub fn new(
        config: AlarmConfig,
        shutdown_signal: watch::Receiver<()>,
    ) -> Self {
        Self {
            config,
            event_sink: None,
            shutdown_signal,
        }
    }

    pub fn event_sink(
        mut self,
        sink: Arc<dyn EventSink>,
    ) -> Self {
        self.event_sink = Some(sink);
        self
    }

    /// Validates the configuration and wires the shared context. Nothing
    /// runs until [`AlarmScheduler::run`] is awaited.
    pub fn build(self) -> Result<AlarmScheduler> {
        let config = self.config.validate()?;
        debug!("building alarm scheduler with {:?}", config);

        let sink = self.event_sink.unwrap_or_else(|| Arc::new(TracingSink));
        let ctx = Arc::new(AlarmContext::new(&config, sink)?);
        let coordinator = Coordinator::new(ctx.clone(), self.shutdown_signal);

        Ok(AlarmScheduler::new(ctx, coordinator))
    }
}
