use serde::Deserialize;
use serde::Serialize;

use crate::Result;

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct EventConfig {
    /// Attach the resulting collection snapshot to every emitted event.
    /// Useful for debugging; costs one clone of the collection per mutation.
    #[serde(default)]
    pub emit_snapshots: bool,
}

impl EventConfig {
    pub fn validate(&self) -> Result<()> {
        Ok(())
    }
}
