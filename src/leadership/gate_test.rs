use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use super::gate::parse_master_address;
use super::LeaderProbe;
use super::LeadershipGate;
use super::LeadershipState;
use super::MockLeaderProbe;
use crate::config::NodeConfig;
use crate::NetworkError;

const PROBE_TIMEOUT: Duration = Duration::from_secs(1);

fn node_config() -> NodeConfig {
    NodeConfig {
        group_name: "prod-es-master-v012".to_string(),
        public_ip: "54.10.0.1".to_string(),
        local_ip: "10.0.0.1".to_string(),
        log_dir: PathBuf::from("./logs"),
    }
}

#[test]
fn test_parse_master_address_extracts_third_field() {
    let line = "dKbk5kCaT1ialnXQBKEToQ 10.0.0.12 10.0.0.12 engine-node-3";

    assert_eq!(parse_master_address(line).unwrap(), "10.0.0.12");
}

#[test]
fn test_parse_master_address_rejects_short_lines() {
    for line in ["", "   ", "one two"] {
        let err = parse_master_address(line).unwrap_err();
        assert!(
            matches!(
                err,
                crate::Error::System(crate::SystemError::Network(NetworkError::MalformedStatusLine(_)))
            ),
            "line {line:?} must be rejected"
        );
    }
}

#[tokio::test]
async fn gate_flips_sticky_on_matching_public_address() {
    let mut probe = MockLeaderProbe::new();
    // A single probe call: the second evaluation must short-circuit.
    probe
        .expect_fetch_master_line()
        .times(1)
        .returning(|_| Ok("id host 54.10.0.1 node-1".to_string()));

    let state = Arc::new(LeadershipState::new());
    let gate = LeadershipGate::new(probe, state.clone(), &node_config());

    assert!(gate.is_leader(PROBE_TIMEOUT).await);
    assert!(state.is_leader());

    // Sticky even though another probe would now report a different master.
    assert!(gate.is_leader(PROBE_TIMEOUT).await);
}

#[tokio::test]
async fn gate_matches_internal_address_case_insensitively() {
    let mut probe = MockLeaderProbe::new();
    probe
        .expect_fetch_master_line()
        .times(1)
        .returning(|_| Ok("id host Engine-A.Local node-1".to_string()));

    let state = Arc::new(LeadershipState::new());
    let mut node = node_config();
    node.local_ip = "engine-a.local".to_string();
    let gate = LeadershipGate::new(probe, state.clone(), &node);

    assert!(gate.is_leader(PROBE_TIMEOUT).await);
}

#[tokio::test]
async fn gate_keeps_probing_while_master_is_elsewhere() {
    let mut probe = MockLeaderProbe::new();
    probe
        .expect_fetch_master_line()
        .times(3)
        .returning(|_| Ok("id host 10.0.0.99 node-9".to_string()));

    let state = Arc::new(LeadershipState::new());
    let gate = LeadershipGate::new(probe, state.clone(), &node_config());

    for _ in 0..3 {
        assert!(!gate.is_leader(PROBE_TIMEOUT).await);
    }
    assert!(!state.is_leader());
}

#[tokio::test]
async fn gate_treats_probe_errors_as_non_leader() {
    let mut probe = MockLeaderProbe::new();
    probe
        .expect_fetch_master_line()
        .times(2)
        .returning(|_| Err(NetworkError::ServiceUnavailable("engine warming up".to_string()).into()));

    let state = Arc::new(LeadershipState::new());
    let gate = LeadershipGate::new(probe, state.clone(), &node_config());

    assert!(!gate.is_leader(PROBE_TIMEOUT).await);
    assert!(!gate.is_leader(PROBE_TIMEOUT).await);
    assert!(!state.is_leader());
}

#[tokio::test]
async fn gate_treats_malformed_lines_as_non_leader() {
    let mut probe = MockLeaderProbe::new();
    probe
        .expect_fetch_master_line()
        .times(1)
        .returning(|_| Ok("garbage".to_string()));

    let state = Arc::new(LeadershipState::new());
    let gate = LeadershipGate::new(probe, state, &node_config());

    assert!(!gate.is_leader(PROBE_TIMEOUT).await);
}
