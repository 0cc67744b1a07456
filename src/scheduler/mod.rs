//! Single-worker schedule driving the reconciler.
//!
//! One task owns the timer and runs every tick to completion before the
//! next one is allowed to start, so ticks never overlap. A tick that
//! overruns the period delays the next tick instead of skipping it.
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use nanoid::nanoid;
use rand::Rng;
use tokio::sync::watch;
use tokio::time::interval_at;
use tokio::time::Instant;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::config::LifecycleConfig;
use crate::config::SidecarConfig;
use crate::engine::ClusterIndexClient;
use crate::engine::EngineProcessProbe;
use crate::leadership::LeaderProbe;
use crate::lifecycle::ReconcilerTask;
use crate::metrics::RECONCILE_TICKS;
use crate::metrics::TICK_DURATION_METRIC;
use crate::Result;


/// Fixed-period driver for [`ReconcilerTask`].
///
/// Stops for exactly two reasons: process shutdown, or the task cancelling
/// its own token after observing a permanent-stop condition. Tick failures
/// never stop the schedule.
pub struct ReconcileScheduler<C, E, P>
where
    C: ClusterIndexClient,
    E: EngineProcessProbe,
    P: LeaderProbe,
{
    config: Arc<SidecarConfig>,
    task: ReconcilerTask<C, E, P>,
    cancel: CancellationToken,
    shutdown_signal: watch::Receiver<()>,
}

impl<C, E, P> ReconcileScheduler<C, E, P>
where
    C: ClusterIndexClient,
    E: EngineProcessProbe,
    P: LeaderProbe,
{
    pub fn new(
        config: Arc<SidecarConfig>,
        task: ReconcilerTask<C, E, P>,
        cancel: CancellationToken,
        shutdown_signal: watch::Receiver<()>,
    ) -> Self {
        Self {
            config,
            task,
            cancel,
            shutdown_signal,
        }
    }

    pub async fn run(mut self) -> Result<()> {
        let initial_delay = first_tick_delay(&self.config.lifecycle);
        info!(
            initial_delay_secs = initial_delay.as_secs(),
            period_secs = self.config.lifecycle.schedule_period_secs,
            "reconcile schedule starting"
        );

        let mut ticker = interval_at(
            Instant::now() + initial_delay,
            self.config.lifecycle.schedule_period(),
        );
        // An overrunning tick delays its successor instead of firing a
        // burst of catch-up ticks.
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                // Use biased to ensure branch order
                biased;
                // P0: shutdown received
                _ = self.shutdown_signal.changed() => {
                    warn!("shutdown signal received, stopping the reconcile schedule");
                    return Ok(());
                }
                // P1: the task observed a permanent-stop condition
                _ = self.cancel.cancelled() => {
                    info!("reconcile schedule cancelled, no further ticks will run");
                    return Ok(());
                }
                // P2: next tick
                _ = ticker.tick() => {
                    self.execute_tick().await;
                }
            }
        }
    }

    async fn execute_tick(&self) {
        let tick_id = nanoid!(8);
        let started = Instant::now();
        debug!(%tick_id, "reconcile tick started");

        match self.task.run_tick(Utc::now().date_naive()).await {
            Ok(outcome) => {
                let label = outcome.label();
                RECONCILE_TICKS.with_label_values(&[label]).inc();
                TICK_DURATION_METRIC
                    .with_label_values(&[label])
                    .observe(started.elapsed().as_millis() as f64);
                info!(%tick_id, outcome = label, "reconcile tick finished");
            }
            Err(e) => {
                RECONCILE_TICKS.with_label_values(&["error"]).inc();
                TICK_DURATION_METRIC
                    .with_label_values(&["error"])
                    .observe(started.elapsed().as_millis() as f64);
                warn!(%tick_id, error = %e, "reconcile tick failed, waiting for the next tick");
            }
        }
    }
}

/// Initial delay plus optional uniform jitter.
///
/// Jitter keeps a fleet restarted together from hammering the engine with
/// simultaneous first probes.
fn first_tick_delay(lifecycle: &LifecycleConfig) -> Duration {
    let base = lifecycle.initial_delay();
    if lifecycle.initial_delay_jitter_secs == 0 {
        return base;
    }

    let mut rng = rand::thread_rng();
    base + Duration::from_secs(rng.gen_range(0..=lifecycle.initial_delay_jitter_secs))
}
