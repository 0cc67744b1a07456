use std::time::Duration;

use config::ConfigError;
use serde::Deserialize;
use serde::Serialize;

use crate::utils::net::base_url;
use crate::Error;
use crate::Result;

/// Connection settings for the co-located search-engine process.
///
/// The sidecar only ever talks to the node it runs next to; cluster-wide
/// effects happen because the engine forwards index operations internally.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct EngineConfig {
    #[serde(default = "default_http_host")]
    pub http_host: String,

    #[serde(default = "default_http_port")]
    pub http_port: u16,

    /// TCP connect timeout for every engine request
    #[serde(default = "default_connect_timeout_in_ms")]
    pub connect_timeout_in_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            http_host: default_http_host(),
            http_port: default_http_port(),
            connect_timeout_in_ms: default_connect_timeout_in_ms(),
        }
    }
}

impl EngineConfig {
    /// `host:port` form used for TCP reachability probes.
    pub fn http_addr(&self) -> String {
        format!("{}:{}", self.http_host, self.http_port)
    }

    /// Scheme-qualified root every REST path is joined onto.
    pub fn http_base_url(&self) -> String {
        base_url(&self.http_addr())
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_in_ms)
    }

    /// Validates engine connection configuration
    /// # Errors
    /// Returns `Error::Config` if any configuration rules are violated
    pub fn validate(&self) -> Result<()> {
        if self.http_host.trim().is_empty() {
            return Err(Error::Config(ConfigError::Message(
                "engine.http_host cannot be empty".into(),
            )));
        }

        if self.http_port == 0 {
            return Err(Error::Config(ConfigError::Message(
                "engine.http_port cannot be 0".into(),
            )));
        }

        if self.connect_timeout_in_ms == 0 {
            return Err(Error::Config(ConfigError::Message(
                "engine.connect_timeout_in_ms must be at least 1".into(),
            )));
        }

        Ok(())
    }
}

fn default_http_host() -> String {
    "127.0.0.1".to_string()
}

fn default_http_port() -> u16 {
    9200
}

fn default_connect_timeout_in_ms() -> u64 {
    2000
}
