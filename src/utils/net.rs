use tokio::net::TcpStream;

/// accept host either like 127.0.0.1:9200 or docker host name: engine1:9200
pub(crate) fn base_url(addr: &str) -> String {
    // Strip existing "http://" or "https://" prefixes if duplicated.
    let normalized = addr.trim_start_matches("http://").trim_start_matches("https://");
    // Re-add a single "http://" prefix.
    format!("http://{}", normalized)
}

pub(crate) async fn is_server_ready(addr: &str) -> bool {
    TcpStream::connect(addr).await.is_ok()
}
