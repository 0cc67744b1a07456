use std::path::PathBuf;

use config::ConfigError;
use serde::Deserialize;
use serde::Serialize;

use super::validate_directory;
use crate::constants::MASTER_GROUP_TAG;
use crate::Error;
use crate::Result;

/// Identity of the local sidecar node.
///
/// The sidecar compares the engine-reported leader address against this
/// node's candidate addresses, and uses the deployment-group name to decide
/// whether the node can ever hold the master role at all.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct NodeConfig {
    /// Deployment-group name (autoscaling group / instance group). Groups
    /// whose lowercase name does not contain `"master"` never become leader.
    #[serde(default = "default_group_name")]
    pub group_name: String,

    /// Externally routable address of this node
    #[serde(default = "default_loopback")]
    pub public_ip: String,

    /// Cluster-internal address of this node
    #[serde(default = "default_loopback")]
    pub local_ip: String,

    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            group_name: default_group_name(),
            public_ip: default_loopback(),
            local_ip: default_loopback(),
            log_dir: default_log_dir(),
        }
    }
}

impl NodeConfig {
    /// True if this node's group can ever be elected master. Nodes outside
    /// master-tagged groups self-disable their reconcile schedule.
    pub fn is_master_eligible(&self) -> bool {
        self.group_name.to_lowercase().contains(MASTER_GROUP_TAG)
    }

    /// Addresses the leader-probe response may legitimately report for this
    /// node, in comparison priority order.
    pub fn candidate_addresses(&self) -> [&str; 2] {
        [&self.public_ip, &self.local_ip]
    }

    /// Validates node identity configuration
    /// # Errors
    /// Returns `Error::Config` if any configuration rules are violated
    pub fn validate(&self) -> Result<()> {
        if self.group_name.trim().is_empty() {
            return Err(Error::Config(ConfigError::Message(
                "node.group_name cannot be empty".into(),
            )));
        }

        if self.public_ip.trim().is_empty() || self.local_ip.trim().is_empty() {
            return Err(Error::Config(ConfigError::Message(
                "node.public_ip and node.local_ip must both be set".into(),
            )));
        }

        validate_directory(&self.log_dir, "node.log_dir")?;

        Ok(())
    }
}

fn default_group_name() -> String {
    "standalone-master".to_string()
}

fn default_loopback() -> String {
    "127.0.0.1".to_string()
}

fn default_log_dir() -> PathBuf {
    PathBuf::from("./logs")
}
