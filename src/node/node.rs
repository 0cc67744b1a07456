//! Top-level handle for a running lifecycle sidecar.
//!
//! ## Key Responsibilities
//! - Owns the reconcile schedule and drives it to completion
//! - Exposes the shared leadership flag for concurrent readers
//! - Reports whether the schedule has permanently stopped itself

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::config::SidecarConfig;
use crate::engine::HttpEngineClient;
use crate::engine::TcpEngineProbe;
use crate::leadership::HttpLeaderProbe;
use crate::leadership::LeadershipState;
use crate::scheduler::ReconcileScheduler;
use crate::Result;

pub struct Sidecar {
    pub(crate) scheduler: ReconcileScheduler<HttpEngineClient, TcpEngineProbe, HttpLeaderProbe>,
    pub(crate) leadership: Arc<LeadershipState>,
    pub(crate) cancel: CancellationToken,

    pub config: Arc<SidecarConfig>,
}

impl Sidecar {
    /// Runs the reconcile schedule until process shutdown or until the
    /// schedule cancels itself.
    pub async fn run(self) -> Result<()> {
        self.scheduler.run().await
    }

    /// Shared leadership flag. Other workers may read it concurrently; it
    /// is only ever flipped false-to-true by the schedule's single worker.
    pub fn leadership(&self) -> Arc<LeadershipState> {
        self.leadership.clone()
    }

    /// True once the schedule has stopped permanently. There is no way to
    /// re-enable without restarting the process.
    pub fn lifecycle_halted(&self) -> bool {
        self.cancel.is_cancelled()
    }
}
