//! In-memory alarm scheduler.
//!
//! Alarms live in an [`AlarmStore`] ordered by message number. Callers ask
//! for per-type display workers through the [`MonitorRegistry`] and for
//! removals through the [`CancellationQueue`]; a single [`Coordinator`]
//! reconciles the three collections every tick while [`MonitorWorker`]s
//! report countdowns and flag expired alarms. Every collection sits behind
//! its own [`RwLatch`], and no code path ever holds two of them at once.

mod config;
mod core;
mod errors;
mod events;
mod latch;
mod metrics;
mod scheduler;
mod store;
pub(crate) mod utils;

pub use self::core::*;

pub use self::config::*;
pub use errors::*;
pub use events::*;
pub use latch::*;
pub use metrics::SchedulerMetrics;
pub use scheduler::*;
pub use store::*;

//-----------------------------------------------------------
// Test utils

#[cfg(test)]
pub(crate) mod test_utils;
