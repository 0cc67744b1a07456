//! A builder pattern implementation for constructing a [`Sidecar`] instance.
//!
//! The [`SidecarBuilder`] provides a fluent interface to configure and
//! assemble the components the sidecar needs: the engine REST client, the
//! process probe, the leader probe and the reconcile schedule wiring.
//!
//! ## Key Design Points
//! - **Default Components**: Initializes with production defaults (HTTP engine client, TCP process
//!   probe, cat-master leader probe).
//! - **Customization**: Allows overriding defaults via setter methods (e.g., `engine_client()`,
//!   `leader_probe()`).
//! - **Lifecycle Management**:
//!   - `build()`: Assembles the [`Sidecar`] and wires the cancellation token through the task.
//!   - `start_metrics_server()`: Launches the Prometheus endpoint when enabled.
//!   - `ready()`: Finalizes construction and returns the initialized [`Sidecar`].
//!
//! ## Example
//! ```ignore
//!
//! let (shutdown_tx, shutdown_rx) = watch::channel(());
//! let sidecar = SidecarBuilder::new(None, shutdown_rx)?
//!     .build()?
//!     .start_metrics_server(shutdown_tx.subscribe())
//!     .ready()?;
//! sidecar.run().await?;
//! ```

use std::sync::Arc;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::info;

use super::Sidecar;
use crate::config::SidecarConfig;
use crate::engine::HttpEngineClient;
use crate::engine::TcpEngineProbe;
use crate::leadership::HttpLeaderProbe;
use crate::leadership::LeadershipGate;
use crate::leadership::LeadershipState;
use crate::lifecycle::ReconcilerTask;
use crate::metrics;
use crate::scheduler::ReconcileScheduler;
use crate::Result;
use crate::SystemError;

/// Builder pattern implementation for constructing a sidecar with
/// configurable collaborators.
pub struct SidecarBuilder {
    pub(super) config: SidecarConfig,
    pub(super) engine_client: Option<HttpEngineClient>,
    pub(super) process_probe: Option<TcpEngineProbe>,
    pub(super) leader_probe: Option<HttpLeaderProbe>,
    pub(super) shutdown_signal: watch::Receiver<()>,

    pub(super) sidecar: Option<Sidecar>,
}

impl SidecarBuilder {
    /// Creates a new SidecarBuilder with configuration loaded from the
    /// default sources, optionally overridden from a file.
    ///
    /// # Arguments
    /// * `override_path` - Optional path to an override configuration file
    /// * `shutdown_signal` - Watch channel for graceful shutdown signaling
    pub fn new(
        override_path: Option<&str>,
        shutdown_signal: watch::Receiver<()>,
    ) -> Result<Self> {
        let mut config = SidecarConfig::new()?;
        if let Some(p) = override_path {
            info!("with_override_config from: {}", p);
            config = config.with_override_config(p)?;
        }
        let config = config.validate()?;
        Ok(Self::init(config, shutdown_signal))
    }

    /// Core initialization logic shared by all construction paths
    pub fn init(
        config: SidecarConfig,
        shutdown_signal: watch::Receiver<()>,
    ) -> Self {
        Self {
            config,
            engine_client: None,
            process_probe: None,
            leader_probe: None,
            shutdown_signal,
            sidecar: None,
        }
    }

    /// Sets a custom engine REST client
    pub fn engine_client(
        mut self,
        engine_client: HttpEngineClient,
    ) -> Self {
        self.engine_client = Some(engine_client);
        self
    }

    /// Sets a custom engine process probe
    pub fn process_probe(
        mut self,
        process_probe: TcpEngineProbe,
    ) -> Self {
        self.process_probe = Some(process_probe);
        self
    }

    /// Sets a custom leader probe
    pub fn leader_probe(
        mut self,
        leader_probe: HttpLeaderProbe,
    ) -> Self {
        self.leader_probe = Some(leader_probe);
        self
    }

    /// Replaces the entire sidecar configuration
    pub fn config(
        mut self,
        config: SidecarConfig,
    ) -> Self {
        self.config = config;
        self
    }

    /// Finalizes the builder and constructs the sidecar instance.
    ///
    /// Initializes default implementations for any unconfigured
    /// collaborator, then wires the leadership gate, the reconciler task
    /// and the schedule around one shared cancellation token.
    pub fn build(mut self) -> Result<Self> {
        let config = Arc::new(self.config.clone());

        let engine_client = match self.engine_client.take() {
            Some(engine_client) => engine_client,
            None => HttpEngineClient::new(&config.engine)?,
        };
        let process_probe = self
            .process_probe
            .take()
            .unwrap_or_else(|| TcpEngineProbe::new(&config.engine));
        let leader_probe = match self.leader_probe.take() {
            Some(leader_probe) => leader_probe,
            None => HttpLeaderProbe::new(&config.engine)?,
        };

        let leadership = Arc::new(LeadershipState::new());
        let cancel = CancellationToken::new();

        let gate = LeadershipGate::new(leader_probe, leadership.clone(), &config.node);
        let task = ReconcilerTask::new(config.clone(), engine_client, process_probe, gate, cancel.clone());
        let scheduler = ReconcileScheduler::new(
            config.clone(),
            task,
            cancel.clone(),
            self.shutdown_signal.clone(),
        );

        self.sidecar = Some(Sidecar {
            scheduler,
            leadership,
            cancel,
            config,
        });
        Ok(self)
    }

    /// Starts the metrics server for monitoring sidecar operations.
    ///
    /// Launches a Prometheus endpoint on the configured port when enabled.
    pub fn start_metrics_server(
        self,
        shutdown_signal: watch::Receiver<()>,
    ) -> Self {
        if !self.config.monitoring.prometheus_enabled {
            info!("prometheus metrics server is disabled");
            return self;
        }

        let port = self.config.monitoring.prometheus_port;
        tokio::spawn(async move {
            metrics::start_server(port, shutdown_signal).await;
        });
        self
    }

    /// Returns the built sidecar instance after successful construction.
    ///
    /// # Errors
    /// Returns `SystemError::NodeStartFailed` if build hasn't completed
    pub fn ready(self) -> Result<Sidecar> {
        self.sidecar
            .ok_or_else(|| SystemError::NodeStartFailed("check sidecar ready failed".to_string()).into())
    }
}
