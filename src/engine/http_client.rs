use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use autometrics::autometrics;
use serde::Deserialize;
use tracing::debug;

use super::ClusterIndexClient;
use super::ClusterIndexSnapshot;
use super::IndexState;
use crate::config::EngineConfig;
use crate::constants::CAT_INDICES_PATH;
use crate::errors::NetworkError;
use crate::Error;
use crate::Result;
use crate::API_SLO;

/// Row shape of the index listing requested with `format=json&h=index,status`.
#[derive(Debug, Deserialize)]
struct CatIndexRow {
    index: String,
    status: String,
}

/// Acknowledgement envelope returned by index create/delete calls.
#[derive(Debug, Deserialize)]
struct AckResponse {
    acknowledged: bool,
}

/// [`ClusterIndexClient`] over the engine's REST API.
///
/// The connect timeout is fixed at construction; each request additionally
/// carries the per-operation timeout passed by the caller.
pub struct HttpEngineClient {
    base_url: String,
    client: reqwest::Client,
}

impl HttpEngineClient {
    pub fn new(config: &EngineConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout())
            .build()?;

        Ok(Self {
            base_url: config.http_base_url(),
            client,
        })
    }

    fn endpoint(
        &self,
        path: &str,
    ) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Maps a transport failure onto the network error taxonomy, folding
/// client-side deadline hits into an explicit timeout variant.
pub(crate) fn classify_request_error(
    err: reqwest::Error,
    endpoint: &str,
    timeout: Duration,
) -> Error {
    if err.is_timeout() {
        NetworkError::Timeout {
            endpoint: endpoint.to_string(),
            duration: timeout,
        }
        .into()
    } else {
        NetworkError::from(err).into()
    }
}

#[async_trait]
impl ClusterIndexClient for HttpEngineClient {
    #[autometrics(objective = API_SLO)]
    async fn list_indices(
        &self,
        timeout: Duration,
    ) -> Result<ClusterIndexSnapshot> {
        let endpoint = self.endpoint(CAT_INDICES_PATH);

        let response = self
            .client
            .get(&endpoint)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| classify_request_error(e, &endpoint, timeout))?;

        if !response.status().is_success() {
            return Err(NetworkError::UnexpectedStatus {
                status: response.status().as_u16(),
                endpoint,
            }
            .into());
        }

        let rows: Vec<CatIndexRow> = response.json().await.map_err(|e| classify_request_error(e, &endpoint, timeout))?;

        let indices: BTreeMap<String, IndexState> = rows
            .into_iter()
            .map(|row| (row.index, IndexState::from_status(&row.status)))
            .collect();

        debug!("listed {} indices from the cluster", indices.len());
        Ok(ClusterIndexSnapshot { indices })
    }

    #[autometrics(objective = API_SLO)]
    async fn index_exists(
        &self,
        index: &str,
        timeout: Duration,
    ) -> Result<bool> {
        let endpoint = self.endpoint(&format!("/{index}"));

        let response = self
            .client
            .head(&endpoint)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| classify_request_error(e, &endpoint, timeout))?;

        match response.status().as_u16() {
            200 => Ok(true),
            404 => Ok(false),
            status => Err(NetworkError::UnexpectedStatus { endpoint, status }.into()),
        }
    }

    #[autometrics(objective = API_SLO)]
    async fn create_index(
        &self,
        index: &str,
        timeout: Duration,
    ) -> Result<bool> {
        let endpoint = self.endpoint(&format!("/{index}"));

        let response = self
            .client
            .put(&endpoint)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| classify_request_error(e, &endpoint, timeout))?;

        if !response.status().is_success() {
            return Err(NetworkError::UnexpectedStatus {
                status: response.status().as_u16(),
                endpoint,
            }
            .into());
        }

        let ack: AckResponse = response.json().await.map_err(|e| classify_request_error(e, &endpoint, timeout))?;
        Ok(ack.acknowledged)
    }

    #[autometrics(objective = API_SLO)]
    async fn delete_index(
        &self,
        index: &str,
        timeout: Duration,
    ) -> Result<bool> {
        let endpoint = self.endpoint(&format!("/{index}"));

        let response = self
            .client
            .delete(&endpoint)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| classify_request_error(e, &endpoint, timeout))?;

        if !response.status().is_success() {
            return Err(NetworkError::UnexpectedStatus {
                status: response.status().as_u16(),
                endpoint,
            }
            .into());
        }

        let ack: AckResponse = response.json().await.map_err(|e| classify_request_error(e, &endpoint, timeout))?;
        Ok(ack.acknowledged)
    }
}
