use autometrics::prometheus_exporter::{self, PrometheusResponse};
use lazy_static::lazy_static;
use prometheus::{
    exponential_buckets, register_histogram_vec, GaugeVec, HistogramVec, IntCounterVec, Opts,
    Registry,
};
use tokio::sync::watch;
use warp::{Filter, Rejection, Reply};

lazy_static! {
    pub static ref TICK_DURATION_METRIC: HistogramVec = register_histogram_vec!(
        "tick_duration_metric",
        "Histogram of reconcile tick duration in ms",
        &["outcome"],
        exponential_buckets(1.0, 2.0, 12).unwrap()
    )
    .expect("metric can not be created");

    pub static ref RECONCILE_TICKS: IntCounterVec = IntCounterVec::new(
        Opts::new("reconcile_ticks", "reconcile_ticks"),
        &["outcome"]
    )
    .expect("Should succeed to create metric");

    pub static ref DELETED_INDICES: IntCounterVec = IntCounterVec::new(
        Opts::new("deleted_indices", "Expired indices deleted, per index family"),
        &["family"]
    )
    .expect("Should succeed to create metric");

    pub static ref PRE_CREATED_INDICES: IntCounterVec = IntCounterVec::new(
        Opts::new("pre_created_indices", "Next-period indices created, per index family"),
        &["family"]
    )
    .expect("Should succeed to create metric");

    pub static ref ENTRY_FAILURES: IntCounterVec = IntCounterVec::new(
        Opts::new("entry_failures", "entry_failures"),
        &["family"]
    )
    .expect("Should succeed to create metric");

    pub static ref LEADERSHIP_STATUS: GaugeVec = GaugeVec::new(
        Opts::new("leadership_status", "1 while this node observes itself as elected master"),
        &["group"]
    )
    .expect("metric can not be created");

    pub static ref REGISTRY: Registry = Registry::new();
}

fn register_custom_metrics() {
    REGISTRY
        .register(Box::new(TICK_DURATION_METRIC.clone()))
        .expect("collector can be registered");
    REGISTRY
        .register(Box::new(RECONCILE_TICKS.clone()))
        .expect("collector can be registered");
    REGISTRY
        .register(Box::new(DELETED_INDICES.clone()))
        .expect("collector can be registered");
    REGISTRY
        .register(Box::new(PRE_CREATED_INDICES.clone()))
        .expect("collector can be registered");
    REGISTRY
        .register(Box::new(ENTRY_FAILURES.clone()))
        .expect("collector can be registered");
    REGISTRY
        .register(Box::new(LEADERSHIP_STATUS.clone()))
        .expect("collector can be registered");
}

pub async fn start_server(port: u16, mut shutdown_signal: watch::Receiver<()>) {
    register_custom_metrics();

    let metrics_route = warp::path!("metrics").and_then(metrics_handler);

    let (_, server) =
        warp::serve(metrics_route).bind_with_graceful_shutdown(([0, 0, 0, 0], port), async move {
            let _ = shutdown_signal.changed().await;
        });
    server.await;
}

async fn metrics_handler() -> Result<impl Reply, Rejection> {
    use prometheus::Encoder;
    let encoder = prometheus::TextEncoder::new();

    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&REGISTRY.gather(), &mut buffer) {
        eprintln!("could not encode custom metrics: {}", e);
    };
    let mut res = match String::from_utf8(buffer.clone()) {
        Ok(v) => v,
        Err(e) => {
            eprintln!("custom metrics could not be from_utf8'd: {}", e);
            String::default()
        }
    };
    buffer.clear();

    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&prometheus::gather(), &mut buffer) {
        eprintln!("could not encode prometheus metrics: {}", e);
    };
    let res_custom = match String::from_utf8(buffer.clone()) {
        Ok(v) => v,
        Err(e) => {
            eprintln!("prometheus metrics could not be from_utf8'd: {}", e);
            String::default()
        }
    };
    buffer.clear();

    let autometrics_metrics = get_metrics_body();
    res.push_str(&res_custom);
    res.push_str(&autometrics_metrics);
    Ok(res)
}

/// Export metrics for Prometheus to scrape
pub fn get_metrics_body() -> String {
    let autometrics_response = prometheus_exporter::encode_http_response();
    autometrics_response.into_body()
}
/// Export metrics for Prometheus to scrape
pub fn get_metrics() -> PrometheusResponse {
    prometheus_exporter::encode_http_response()
}
