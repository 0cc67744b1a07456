//! Shared helpers for sidecar integration tests: an in-process stub engine
//! serving the cat-master, cat-indices and index CRUD endpoints over a real
//! HTTP listener.

use std::collections::BTreeSet;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;

use warp::http::StatusCode;
use warp::Filter;

/// Handle on the stub engine's observable state.
#[derive(Clone)]
pub struct StubCluster {
    /// Live index names, mutated by PUT/DELETE like a real cluster.
    pub indices: Arc<Mutex<BTreeSet<String>>>,
    /// Every mutation in arrival order, e.g. `DELETE logs-20240601`.
    pub mutations: Arc<Mutex<Vec<String>>>,
    /// Number of cat-master probes served.
    pub master_hits: Arc<Mutex<usize>>,
}

impl StubCluster {
    pub fn contains(
        &self,
        name: &str,
    ) -> bool {
        self.indices.lock().unwrap().contains(name)
    }

    pub fn mutation_log(&self) -> Vec<String> {
        self.mutations.lock().unwrap().clone()
    }

    pub fn master_probe_count(&self) -> usize {
        *self.master_hits.lock().unwrap()
    }
}

/// Starts a stub engine on an ephemeral loopback port.
///
/// `master_line` is served verbatim from `/_cat/master`; the seeded indices
/// back the listing, exists, create and delete endpoints.
pub async fn start_stub_engine(
    master_line: &str,
    seed_indices: &[String],
) -> (SocketAddr, StubCluster) {
    let cluster = StubCluster {
        indices: Arc::new(Mutex::new(seed_indices.iter().cloned().collect())),
        mutations: Arc::new(Mutex::new(Vec::new())),
        master_hits: Arc::new(Mutex::new(0)),
    };

    let master = {
        let line = master_line.to_string();
        let hits = cluster.master_hits.clone();
        warp::get().and(warp::path!("_cat" / "master")).map(move || {
            *hits.lock().unwrap() += 1;
            line.clone()
        })
    };

    let listing = {
        let indices = cluster.indices.clone();
        warp::get().and(warp::path!("_cat" / "indices")).map(move || {
            let rows: Vec<serde_json::Value> = indices
                .lock()
                .unwrap()
                .iter()
                .map(|name| serde_json::json!({"index": name, "status": "open"}))
                .collect();
            warp::reply::json(&rows)
        })
    };

    let exists = {
        let indices = cluster.indices.clone();
        warp::head()
            .and(warp::path::param::<String>())
            .and(warp::path::end())
            .map(move |index: String| {
                if indices.lock().unwrap().contains(&index) {
                    warp::reply::with_status(warp::reply(), StatusCode::OK)
                } else {
                    warp::reply::with_status(warp::reply(), StatusCode::NOT_FOUND)
                }
            })
    };

    let create = {
        let indices = cluster.indices.clone();
        let mutations = cluster.mutations.clone();
        warp::put()
            .and(warp::path::param::<String>())
            .and(warp::path::end())
            .map(move |index: String| {
                indices.lock().unwrap().insert(index.clone());
                mutations.lock().unwrap().push(format!("PUT {index}"));
                warp::reply::json(&serde_json::json!({"acknowledged": true}))
            })
    };

    let delete = {
        let indices = cluster.indices.clone();
        let mutations = cluster.mutations.clone();
        warp::delete()
            .and(warp::path::param::<String>())
            .and(warp::path::end())
            .map(move |index: String| {
                indices.lock().unwrap().remove(&index);
                mutations.lock().unwrap().push(format!("DELETE {index}"));
                warp::reply::json(&serde_json::json!({"acknowledged": true}))
            })
    };

    let routes = master.or(listing).or(exists).or(create).or(delete);
    let (addr, server) = warp::serve(routes).bind_ephemeral(([127, 0, 0, 1], 0));
    tokio::spawn(server);
    (addr, cluster)
}

/// Polls `condition` until it holds or the deadline passes.
pub async fn wait_until<F>(
    deadline: Duration,
    mut condition: F,
) -> bool
where
    F: FnMut() -> bool,
{
    let poll = Duration::from_millis(50);
    let mut waited = Duration::ZERO;
    while waited < deadline {
        if condition() {
            return true;
        }
        tokio::time::sleep(poll).await;
        waited += poll;
    }
    condition()
}
