//! The three shared collections reconciled by the coordinator.
//!
//! Each collection owns its entries in a `Vec` behind its own
//! [`RwLatch`](crate::RwLatch). No method ever touches two collections, so no caller can
//! end up holding two collection latches at once. Cross-collection logic
//! (monitor admission, pruning, applying cancellations) lives in the
//! scheduler and coordinator, which take one latch at a time.

mod alarm;
mod alarm_store;
mod cancellation_queue;
mod monitor_registry;

pub use alarm::*;
pub use alarm_store::*;
pub use cancellation_queue::*;
pub use monitor_registry::*;

#[cfg(test)]
mod alarm_test;
