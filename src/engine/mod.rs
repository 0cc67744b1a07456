//! REST surface of the co-located search-engine process.
//!
//! The sidecar never talks to remote cluster members directly. It issues
//! every index operation against the engine on its own host and relies on
//! the engine to propagate cluster-wide effects.
mod http_client;
mod process;

pub use http_client::*;
pub use process::*;

#[cfg(test)]
mod http_client_test;

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
#[cfg(test)]
use mockall::predicate::*;

use crate::Result;

/// Live status of one index as reported by the cluster listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexState {
    Open,
    Close,
    /// Any status string this sidecar does not recognize. Listed indices
    /// still participate in retention regardless of status.
    Unknown,
}

impl IndexState {
    pub fn from_status(status: &str) -> Self {
        match status {
            "open" => IndexState::Open,
            "close" => IndexState::Close,
            _ => IndexState::Unknown,
        }
    }
}

/// Point-in-time listing of every index the cluster knows about.
///
/// Fetched fresh at most once per tick and discarded afterwards. Indices
/// appear and disappear out-of-band, so nothing here survives a tick.
#[derive(Debug, Clone, Default)]
pub struct ClusterIndexSnapshot {
    pub indices: BTreeMap<String, IndexState>,
}

impl ClusterIndexSnapshot {
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.indices.keys().map(String::as_str)
    }

    pub fn contains(
        &self,
        name: &str,
    ) -> bool {
        self.indices.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Index-level operations the reconciler issues against the cluster.
///
/// Calls block up to the supplied timeout and surface timeouts as errors.
/// No internal retries: the schedule's next tick is the retry policy.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ClusterIndexClient: Send + Sync + 'static {
    async fn list_indices(
        &self,
        timeout: Duration,
    ) -> Result<ClusterIndexSnapshot>;

    async fn index_exists(
        &self,
        index: &str,
        timeout: Duration,
    ) -> Result<bool>;

    /// Returns the cluster's acknowledgement flag.
    async fn create_index(
        &self,
        index: &str,
        timeout: Duration,
    ) -> Result<bool>;

    /// Returns the cluster's acknowledgement flag.
    async fn delete_index(
        &self,
        index: &str,
        timeout: Duration,
    ) -> Result<bool>;
}

/// Host-local liveness check for the engine process.
///
/// Index maintenance is pointless (and leadership probing impossible) until
/// the engine on this host has come up, so ticks skip themselves while this
/// reports false.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait EngineProcessProbe: Send + Sync + 'static {
    async fn is_started(&self) -> bool;
}
