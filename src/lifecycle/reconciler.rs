use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use tracing::error;
use tracing::info;
use tracing::warn;

use super::future_date;
use super::parse_descriptors;
use super::past_cutoff;
use super::IndexMetadata;
use crate::config::SidecarConfig;
use crate::engine::ClusterIndexClient;
use crate::engine::ClusterIndexSnapshot;
use crate::engine::EngineProcessProbe;
use crate::errors::LifecycleError;
use crate::leadership::LeaderProbe;
use crate::leadership::LeadershipGate;
use crate::metrics::DELETED_INDICES;
use crate::metrics::ENTRY_FAILURES;
use crate::metrics::LEADERSHIP_STATUS;
use crate::metrics::PRE_CREATED_INDICES;
use crate::Result;

/// How a single tick ended.
///
/// Returned to the scheduler for logging and metrics. The permanent-stop
/// variants have already cancelled the schedule's token by the time the
/// caller sees them.
#[derive(Debug)]
pub enum TickOutcome {
    /// Reconciliation is administratively disabled. Permanent stop.
    Disabled,
    /// This node's deployment group can never hold the master role.
    /// Permanent stop.
    NeverEligible,
    /// Engine process not confirmed started on this host. Retried next tick.
    EngineNotReady,
    /// Another node holds the master role. Retried next tick.
    NotLeader,
    /// The descriptor list failed to parse. Retried next tick, since the
    /// live configuration value may be fixed in between.
    BadDescriptors,
    /// Entry processing ran; one outcome per configured descriptor.
    Completed(Vec<EntryOutcome>),
}

impl TickOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            TickOutcome::Disabled => "disabled",
            TickOutcome::NeverEligible => "never_eligible",
            TickOutcome::EngineNotReady => "engine_not_ready",
            TickOutcome::NotLeader => "not_leader",
            TickOutcome::BadDescriptors => "bad_descriptors",
            TickOutcome::Completed(_) => "completed",
        }
    }
}

/// Result of reconciling one descriptor, kept even when a sibling fails.
#[derive(Debug)]
pub struct EntryOutcome {
    pub index_name: String,
    pub result: Result<EntryReport>,
}

/// What actually changed on the cluster for one descriptor this tick.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryReport {
    pub deleted: Vec<String>,
    pub created: Option<String>,
}

/// Per-tick body of the lifecycle loop.
///
/// Stateless across ticks apart from the sticky leadership flag inside the
/// gate. Each tick re-reads configuration, re-checks readiness and
/// leadership, then walks the descriptor list sequentially against a single
/// cluster listing.
pub struct ReconcilerTask<C, E, P>
where
    C: ClusterIndexClient,
    E: EngineProcessProbe,
    P: LeaderProbe,
{
    config: Arc<SidecarConfig>,
    client: C,
    process_probe: E,
    gate: LeadershipGate<P>,
    cancel: CancellationToken,
}

impl<C, E, P> ReconcilerTask<C, E, P>
where
    C: ClusterIndexClient,
    E: EngineProcessProbe,
    P: LeaderProbe,
{
    pub fn new(
        config: Arc<SidecarConfig>,
        client: C,
        process_probe: E,
        gate: LeadershipGate<P>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            config,
            client,
            process_probe,
            gate,
            cancel,
        }
    }

    /// Runs one reconcile pass for the given calendar date.
    ///
    /// The ordered guard checks either end the tick early or fall through to
    /// entry processing. Only a failed cluster listing escalates as `Err`;
    /// everything else is folded into the returned outcome.
    pub async fn run_tick(
        &self,
        today: NaiveDate,
    ) -> Result<TickOutcome> {
        if !self.config.lifecycle.enabled {
            info!("index lifecycle is disabled, cancelling the schedule");
            self.cancel.cancel();
            return Ok(TickOutcome::Disabled);
        }

        if !self.config.node.is_master_eligible() {
            info!(
                group = %self.config.node.group_name,
                "deployment group can never hold the master role, cancelling the schedule"
            );
            self.cancel.cancel();
            return Ok(TickOutcome::NeverEligible);
        }

        if !self.process_probe.is_started().await {
            debug!("engine process is not started yet, skipping this tick");
            return Ok(TickOutcome::EngineNotReady);
        }

        let timeout = self.config.lifecycle.operation_timeout();

        let is_leader = self.gate.is_leader(timeout).await;
        LEADERSHIP_STATUS
            .with_label_values(&[&self.config.node.group_name])
            .set(if is_leader { 1.0 } else { 0.0 });
        if !is_leader {
            debug!("this node is not the elected master, skipping this tick");
            return Ok(TickOutcome::NotLeader);
        }

        // Descriptors are re-parsed from the live configuration value every
        // tick so retention edits land without a restart.
        let entries = match parse_descriptors(&self.config.lifecycle.index_descriptors) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(error = %e, "managed-index descriptors failed to parse, skipping this tick");
                return Ok(TickOutcome::BadDescriptors);
            }
        };

        if entries.is_empty() {
            debug!("no managed-index descriptors configured");
            return Ok(TickOutcome::Completed(Vec::new()));
        }

        // One listing per tick; every entry works against the same snapshot.
        let snapshot = self.client.list_indices(timeout).await?;
        debug!(indices = snapshot.len(), "fetched cluster index listing");

        let mut outcomes = Vec::with_capacity(entries.len());
        for entry in &entries {
            let result = self.process_entry(entry, &snapshot, today, timeout).await;
            if let Err(e) = &result {
                error!(
                    index_name = %entry.index_name,
                    error = %e,
                    "entry reconciliation failed, moving on to the next entry"
                );
                ENTRY_FAILURES.with_label_values(&[&entry.index_name]).inc();
            }
            outcomes.push(EntryOutcome {
                index_name: entry.index_name.clone(),
                result,
            });
        }

        Ok(TickOutcome::Completed(outcomes))
    }

    /// Retention enforcement then optional pre-creation for one descriptor.
    ///
    /// Deletion must be acknowledged by the cluster; an unacknowledged
    /// delete aborts this entry (pre-creation included) but never its
    /// siblings. Creation acknowledgement is only logged: the exists-check
    /// on the next tick settles whether the index actually materialized.
    async fn process_entry(
        &self,
        entry: &IndexMetadata,
        snapshot: &ClusterIndexSnapshot,
        today: NaiveDate,
        timeout: Duration,
    ) -> Result<EntryReport> {
        let pattern = entry.pattern();
        let mut report = EntryReport::default();

        let cutoff = past_cutoff(today, entry.periodicity, entry.retention_count)?;
        for name in snapshot.names() {
            if !pattern.matches(name) {
                continue;
            }
            if pattern.date_value(name)? > cutoff {
                continue;
            }

            let acknowledged = self.client.delete_index(name, timeout).await?;
            if !acknowledged {
                return Err(LifecycleError::DeleteNotAcknowledged {
                    index: name.to_string(),
                }
                .into());
            }

            info!(index = %name, cutoff, "deleted expired index");
            DELETED_INDICES.with_label_values(&[&entry.index_name]).inc();
            report.deleted.push(name.to_string());
        }

        if entry.pre_create {
            let target = pattern.render(future_date(today, entry.periodicity)?);
            if self.client.index_exists(&target, timeout).await? {
                debug!(index = %target, "next-period index already exists");
            } else {
                let acknowledged = self.client.create_index(&target, timeout).await?;
                if acknowledged {
                    info!(index = %target, "pre-created next-period index");
                } else {
                    warn!(index = %target, "create of next-period index was not acknowledged");
                }
                PRE_CREATED_INDICES.with_label_values(&[&entry.index_name]).inc();
                report.created = Some(target);
            }
        }

        Ok(report)
    }
}
