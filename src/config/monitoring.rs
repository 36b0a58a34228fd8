use serde::Deserialize;
use serde::Serialize;

use crate::Error;
use crate::Result;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct MonitoringConfig {
    #[serde(default = "default_metrics_enabled")]
    pub metrics_enabled: bool,

    /// Prefix applied to every exported metric name
    #[serde(default = "default_metrics_namespace")]
    pub metrics_namespace: String,
}
impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            metrics_enabled: default_metrics_enabled(),
            metrics_namespace: default_metrics_namespace(),
        }
    }
}
impl MonitoringConfig {
    /// Validates monitoring configuration
    /// # Errors
    /// Returns `Error::InvalidConfig` when metrics are enabled with an empty
    /// namespace or one prometheus would reject.
    pub fn validate(&self) -> Result<()> {
        if !self.metrics_enabled {
            return Ok(());
        }

        if self.metrics_namespace.is_empty() {
            return Err(Error::InvalidConfig(
                "metrics_namespace cannot be empty when metrics are enabled".into(),
            ));
        }

        if !self
            .metrics_namespace
            .chars()
            .all(|c| c.is_ascii_lowercase() || c == '_')
        {
            return Err(Error::InvalidConfig(format!(
                "metrics_namespace {:?} may only contain [a-z_]",
                self.metrics_namespace
            )));
        }

        Ok(())
    }
}
fn default_metrics_enabled() -> bool {
    true
}

fn default_metrics_namespace() -> String {
    "alarm".to_string()
}
