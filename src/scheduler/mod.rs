//! Public entry point: build an [`AlarmScheduler`] with [`SchedulerBuilder`],
//! drive it with [`AlarmScheduler::run`] and feed it through the three
//! ingress operations.
//!
//! ## Example
//! ```ignore
//! let (shutdown_tx, shutdown_rx) = watch::channel(());
//! let scheduler = Arc::new(
//!     SchedulerBuilder::new(AlarmConfig::new()?, shutdown_rx)
//!         .event_sink(Arc::new(TracingSink))
//!         .build()?,
//! );
//!
//! let runner = scheduler.clone();
//! tokio::spawn(async move { runner.run().await });
//!
//! scheduler.insert_or_replace_alarm(5, 2, 3, "hi");
//! scheduler.register_monitor(2);
//! ```

mod alarm_scheduler;
mod builder;

pub use alarm_scheduler::*;
pub use builder::*;
