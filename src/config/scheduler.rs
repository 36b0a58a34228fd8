use std::time::Duration;

use serde::Deserialize;
use serde::Serialize;

use crate::Error;
use crate::Result;

/// Timing and sizing parameters for the coordinator and monitor workers
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SchedulerConfig {
    /// Interval between coordinator reconciliation passes (milliseconds)
    #[serde(default = "default_coordinator_tick")]
    pub coordinator_tick_in_ms: u64,

    /// Interval between monitor worker display passes (milliseconds)
    #[serde(default = "default_monitor_tick")]
    pub monitor_tick_in_ms: u64,

    /// Alarm messages longer than this many bytes are truncated
    #[serde(default = "default_max_message_len")]
    pub max_message_len: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            coordinator_tick_in_ms: default_coordinator_tick(),
            monitor_tick_in_ms: default_monitor_tick(),
            max_message_len: default_max_message_len(),
        }
    }
}

impl SchedulerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.coordinator_tick_in_ms == 0 {
            return Err(Error::InvalidConfig(
                "coordinator_tick_in_ms must be at least 1ms".into(),
            ));
        }

        if self.monitor_tick_in_ms == 0 {
            return Err(Error::InvalidConfig(
                "monitor_tick_in_ms must be at least 1ms".into(),
            ));
        }

        if self.max_message_len == 0 {
            return Err(Error::InvalidConfig(
                "max_message_len must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    pub fn coordinator_tick(&self) -> Duration {
        Duration::from_millis(self.coordinator_tick_in_ms)
    }

    pub fn monitor_tick(&self) -> Duration {
        Duration::from_millis(self.monitor_tick_in_ms)
    }
}

fn default_coordinator_tick() -> u64 {
    1000
}
fn default_monitor_tick() -> u64 {
    1000
}
// matches the fixed message buffer of the command line front end
fn default_max_message_len() -> usize {
    128
}
