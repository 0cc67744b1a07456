use async_trait::async_trait;

use super::EngineProcessProbe;
use crate::config::EngineConfig;
use crate::utils::net::is_server_ready;

/// Treats a connectable HTTP port as proof the engine process is up.
///
/// Coarser than asking the engine for its own health, but it works during
/// startup windows where the REST layer itself would refuse requests.
pub struct TcpEngineProbe {
    addr: String,
}

impl TcpEngineProbe {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            addr: config.http_addr(),
        }
    }
}

#[async_trait]
impl EngineProcessProbe for TcpEngineProbe {
    async fn is_started(&self) -> bool {
        is_server_ready(&self.addr).await
    }
}
