use std::time::Duration;

use config::ConfigError;
use serde::Deserialize;
use serde::Serialize;

use crate::lifecycle::parse_descriptors;
use crate::Error;
use crate::Result;

/// Schedule and workload of the index-lifecycle reconciler.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LifecycleConfig {
    /// Master switch. When false the schedule cancels itself on first tick.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Delay before the first tick, so a freshly restarted engine has time
    /// to join the cluster before we ask it about leadership.
    #[serde(default = "default_initial_delay_secs")]
    pub initial_delay_secs: u64,

    /// Upper bound of the random extra delay added to the first tick.
    /// Zero disables jitter.
    #[serde(default)]
    pub initial_delay_jitter_secs: u64,

    /// Fixed period between tick starts
    #[serde(default = "default_schedule_period_secs")]
    pub schedule_period_secs: u64,

    /// Budget for each individual engine REST call
    #[serde(default = "default_operation_timeout_secs")]
    pub operation_timeout_secs: u64,

    /// JSON array of managed-index descriptors, re-read every tick so
    /// operators can edit retention without a restart.
    #[serde(default = "default_index_descriptors")]
    pub index_descriptors: String,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            initial_delay_secs: default_initial_delay_secs(),
            initial_delay_jitter_secs: 0,
            schedule_period_secs: default_schedule_period_secs(),
            operation_timeout_secs: default_operation_timeout_secs(),
            index_descriptors: default_index_descriptors(),
        }
    }
}

impl LifecycleConfig {
    pub fn initial_delay(&self) -> Duration {
        Duration::from_secs(self.initial_delay_secs)
    }

    pub fn schedule_period(&self) -> Duration {
        Duration::from_secs(self.schedule_period_secs)
    }

    pub fn operation_timeout(&self) -> Duration {
        Duration::from_secs(self.operation_timeout_secs)
    }

    /// Validates reconcile schedule configuration
    /// # Errors
    /// Returns `Error::Config` if any configuration rules are violated
    pub fn validate(&self) -> Result<()> {
        if self.schedule_period_secs == 0 {
            return Err(Error::Config(ConfigError::Message(
                "lifecycle.schedule_period_secs must be at least 1".into(),
            )));
        }

        if self.operation_timeout_secs == 0 {
            return Err(Error::Config(ConfigError::Message(
                "lifecycle.operation_timeout_secs must be at least 1".into(),
            )));
        }

        // Surface malformed descriptors at startup even though each tick
        // re-parses the live value.
        if let Err(e) = parse_descriptors(&self.index_descriptors) {
            return Err(Error::Config(ConfigError::Message(format!(
                "lifecycle.index_descriptors is invalid: {e}"
            ))));
        }

        Ok(())
    }
}

fn default_enabled() -> bool {
    true
}

fn default_initial_delay_secs() -> u64 {
    300
}

fn default_schedule_period_secs() -> u64 {
    3600
}

fn default_operation_timeout_secs() -> u64 {
    30
}

fn default_index_descriptors() -> String {
    "[]".to_string()
}
