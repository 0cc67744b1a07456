//! Leader detection against the engine's own election state.
//!
//! The sidecar never runs its own election. It piggybacks on the cluster's
//! elected master: each node asks its local engine who the master is and
//! compares the answer against its own addresses. Only the node that sees
//! itself reported as master performs index maintenance.
mod gate;
pub use gate::*;

#[cfg(test)]
mod gate_test;

use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;

/// Process-wide leadership flag.
///
/// Written only from the reconcile worker; metrics and admin surfaces may
/// read concurrently, hence the atomic. The flag is sticky by contract:
/// once observed true it is never reset within a process lifetime, even if
/// the cluster later elects a different master (accepted failover risk of
/// the probe-based design).
#[derive(Debug, Default)]
pub struct LeadershipState {
    is_leader: AtomicBool,
}

impl LeadershipState {
    pub fn new() -> Self {
        Self {
            is_leader: AtomicBool::new(false),
        }
    }

    /// Records that this node has been observed holding the master role.
    pub(crate) fn observe_leader(&self) {
        self.is_leader.store(true, Ordering::SeqCst);
    }

    pub fn is_leader(&self) -> bool {
        self.is_leader.load(Ordering::Acquire)
    }
}
