use std::net::SocketAddr;
use std::time::Duration;

use warp::http::StatusCode;
use warp::Filter;

use super::HttpEngineClient;
use crate::config::EngineConfig;
use crate::engine::ClusterIndexClient;
use crate::engine::IndexState;
use crate::Error;
use crate::NetworkError;
use crate::SystemError;

const OP_TIMEOUT: Duration = Duration::from_secs(2);

fn engine_config(addr: SocketAddr) -> EngineConfig {
    EngineConfig {
        http_host: addr.ip().to_string(),
        http_port: addr.port(),
        connect_timeout_in_ms: 1_000,
    }
}

/// Stub engine with a fixed three-index listing, one existing index and an
/// unacknowledged delete for `stuck-index`.
async fn start_stub_engine() -> SocketAddr {
    let listing = warp::get().and(warp::path!("_cat" / "indices")).map(|| {
        warp::reply::json(&serde_json::json!([
            {"index": "logs-20240602", "status": "open"},
            {"index": "logs-20240601", "status": "close"},
            {"index": "snapshots-2024", "status": "frozen"},
        ]))
    });

    let exists = warp::head().and(warp::path!("logs-20240601")).map(warp::reply);

    let exists_fallback = warp::head()
        .and(warp::path::param::<String>())
        .and(warp::path::end())
        .map(|_index: String| warp::reply::with_status(warp::reply(), StatusCode::NOT_FOUND));

    let create = warp::put()
        .and(warp::path::param::<String>())
        .and(warp::path::end())
        .map(|_index: String| warp::reply::json(&serde_json::json!({"acknowledged": true})));

    let delete = warp::delete()
        .and(warp::path::param::<String>())
        .and(warp::path::end())
        .map(|index: String| {
            let acknowledged = index != "stuck-index";
            warp::reply::json(&serde_json::json!({ "acknowledged": acknowledged }))
        });

    let routes = listing.or(exists).or(exists_fallback).or(create).or(delete);
    let (addr, server) = warp::serve(routes).bind_ephemeral(([127, 0, 0, 1], 0));
    tokio::spawn(server);
    addr
}

#[tokio::test]
async fn list_indices_builds_snapshot_with_status_fallback() {
    let addr = start_stub_engine().await;
    let client = HttpEngineClient::new(&engine_config(addr)).unwrap();

    let snapshot = client.list_indices(OP_TIMEOUT).await.unwrap();

    assert_eq!(snapshot.len(), 3);
    // BTreeMap keys iterate in name order
    assert_eq!(
        snapshot.names().collect::<Vec<_>>(),
        vec!["logs-20240601", "logs-20240602", "snapshots-2024"]
    );
    assert_eq!(snapshot.indices["logs-20240601"], IndexState::Close);
    assert_eq!(snapshot.indices["logs-20240602"], IndexState::Open);
    // Unrecognized status strings degrade to Unknown instead of failing
    assert_eq!(snapshot.indices["snapshots-2024"], IndexState::Unknown);
}

#[tokio::test]
async fn index_exists_maps_head_status_codes() {
    let addr = start_stub_engine().await;
    let client = HttpEngineClient::new(&engine_config(addr)).unwrap();

    assert!(client.index_exists("logs-20240601", OP_TIMEOUT).await.unwrap());
    assert!(!client.index_exists("logs-20240611", OP_TIMEOUT).await.unwrap());
}

#[tokio::test]
async fn create_index_returns_acknowledgement() {
    let addr = start_stub_engine().await;
    let client = HttpEngineClient::new(&engine_config(addr)).unwrap();

    assert!(client.create_index("logs-20240611", OP_TIMEOUT).await.unwrap());
}

#[tokio::test]
async fn delete_index_reports_unacknowledged_deletes() {
    let addr = start_stub_engine().await;
    let client = HttpEngineClient::new(&engine_config(addr)).unwrap();

    assert!(client.delete_index("logs-20240601", OP_TIMEOUT).await.unwrap());
    // The client reports the flag verbatim; escalation is the reconciler's call.
    assert!(!client.delete_index("stuck-index", OP_TIMEOUT).await.unwrap());
}

#[tokio::test]
async fn list_indices_times_out_against_stalled_engine() {
    let stalled = warp::get().and(warp::path!("_cat" / "indices")).then(|| async {
        tokio::time::sleep(Duration::from_secs(5)).await;
        warp::reply::json(&serde_json::json!([]))
    });
    let (addr, server) = warp::serve(stalled).bind_ephemeral(([127, 0, 0, 1], 0));
    tokio::spawn(server);

    let client = HttpEngineClient::new(&engine_config(addr)).unwrap();
    let result = client.list_indices(Duration::from_millis(50)).await;

    assert!(matches!(
        result,
        Err(Error::System(SystemError::Network(NetworkError::Timeout { .. })))
    ));
}

#[tokio::test]
async fn list_indices_rejects_error_statuses() {
    let broken = warp::get()
        .and(warp::path!("_cat" / "indices"))
        .map(|| warp::reply::with_status("engine overloaded", StatusCode::SERVICE_UNAVAILABLE));
    let (addr, server) = warp::serve(broken).bind_ephemeral(([127, 0, 0, 1], 0));
    tokio::spawn(server);

    let client = HttpEngineClient::new(&engine_config(addr)).unwrap();
    let result = client.list_indices(OP_TIMEOUT).await;

    assert!(matches!(
        result,
        Err(Error::System(SystemError::Network(NetworkError::UnexpectedStatus { status: 503, .. })))
    ));
}
