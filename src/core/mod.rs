//! Background reconciliation: the coordinator and the monitor workers it
//! spawns, plus the shared context they operate on.

mod context;
mod coordinator;
mod monitor_worker;

pub use context::*;
pub use coordinator::*;
pub use monitor_worker::*;
