use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use autometrics::autometrics;
#[cfg(test)]
use mockall::automock;
#[cfg(test)]
use mockall::predicate::*;
use tracing::debug;
use tracing::info;
use tracing::warn;

use super::LeadershipState;
use crate::config::EngineConfig;
use crate::config::NodeConfig;
use crate::constants::CAT_MASTER_PATH;
use crate::constants::MASTER_ADDRESS_FIELD;
use crate::engine::classify_request_error;
use crate::errors::NetworkError;
use crate::Result;
use crate::API_SLO;

/// Fetches the engine's one-line elected-master summary.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait LeaderProbe: Send + Sync + 'static {
    /// Raw positional status line, e.g.
    /// `dKbk5kCaT1ialnXQBKEToQ 10.0.0.12 10.0.0.12 engine-node-3`.
    async fn fetch_master_line(
        &self,
        timeout: Duration,
    ) -> Result<String>;
}

/// [`LeaderProbe`] over the engine's cat-master endpoint.
pub struct HttpLeaderProbe {
    endpoint: String,
    client: reqwest::Client,
}

impl HttpLeaderProbe {
    pub fn new(config: &EngineConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout())
            .build()?;

        Ok(Self {
            endpoint: format!("{}{}", config.http_base_url(), CAT_MASTER_PATH),
            client,
        })
    }
}

#[async_trait]
impl LeaderProbe for HttpLeaderProbe {
    #[autometrics(objective = API_SLO)]
    async fn fetch_master_line(
        &self,
        timeout: Duration,
    ) -> Result<String> {
        let response = self
            .client
            .get(&self.endpoint)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| classify_request_error(e, &self.endpoint, timeout))?;

        if !response.status().is_success() {
            return Err(NetworkError::UnexpectedStatus {
                status: response.status().as_u16(),
                endpoint: self.endpoint.clone(),
            }
            .into());
        }

        let line = response
            .text()
            .await
            .map_err(|e| classify_request_error(e, &self.endpoint, timeout))?;
        Ok(line)
    }
}

/// Sticky leadership gate evaluated once per tick.
///
/// While the flag is false every evaluation probes the engine, extracts the
/// elected master's address from the status line and compares it against
/// this node's candidate addresses. One positive observation flips
/// [`LeadershipState`] for the rest of the process lifetime and later
/// evaluations short-circuit without probing.
pub struct LeadershipGate<P: LeaderProbe> {
    probe: P,
    state: Arc<LeadershipState>,
    candidates: Vec<String>,
}

impl<P: LeaderProbe> LeadershipGate<P> {
    pub fn new(
        probe: P,
        state: Arc<LeadershipState>,
        node: &NodeConfig,
    ) -> Self {
        let candidates = node.candidate_addresses().iter().map(|a| a.to_string()).collect();

        Self {
            probe,
            state,
            candidates,
        }
    }

    /// True when this node holds (or has ever held) the master role.
    ///
    /// Probe and parse failures log and yield false for this tick. The next
    /// tick retries naturally; nothing escalates to the caller.
    pub async fn is_leader(
        &self,
        timeout: Duration,
    ) -> bool {
        if self.state.is_leader() {
            return true;
        }

        let line = match self.probe.fetch_master_line(timeout).await {
            Ok(line) => line,
            Err(e) => {
                warn!(error = %e, "leader probe failed, staying non-leader this tick");
                return false;
            }
        };

        match parse_master_address(&line) {
            Ok(address) => {
                if self.candidates.iter().any(|c| c.eq_ignore_ascii_case(address)) {
                    info!(%address, "observed this node as the elected master");
                    self.state.observe_leader();
                    true
                } else {
                    debug!(%address, "cluster master is another node");
                    false
                }
            }
            Err(e) => {
                warn!(error = %e, "leader probe returned an unusable status line");
                false
            }
        }
    }
}

/// Extracts the master address from the engine's positional status line.
///
/// Field layout is `<node-id> <host> <address> <node-name>`; only the
/// address field is consumed. The layout is a documented fragility: older
/// engines expose no structured alternative, so moving a field silently
/// breaks detection.
pub(crate) fn parse_master_address(line: &str) -> Result<&str> {
    line.split_whitespace()
        .nth(MASTER_ADDRESS_FIELD)
        .ok_or_else(|| NetworkError::MalformedStatusLine(line.to_string()).into())
}
