use super::protocol::{PhotoResponse, SCAN_QUERY_PARAM};
use crate::membership::types::WorkerNode;

use anyhow::{Result, bail};
use reqwest::StatusCode;
use std::time::Duration;

/// HTTP client for the worker scan endpoint. Cheap to clone.
#[derive(Clone)]
pub struct ScanClient {
    http_client: reqwest::Client,
    timeout: Duration,
}

impl ScanClient {
    pub fn new(timeout: Duration) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            timeout,
        }
    }

    /// `GET <scan url>?value=<directory>`. Anything but a 200 with a
    /// decodable body is an error; there is no retry here.
    pub async fn scan_directory(&self, node: &WorkerNode, directory: &str) -> Result<PhotoResponse> {
        let url = node.scan_url();
        tracing::debug!("Requesting scan of {} from {}", directory, url);

        let response = self
            .http_client
            .get(&url)
            .query(&[(SCAN_QUERY_PARAM, directory)])
            .timeout(self.timeout)
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            bail!("worker {} answered {} for {}", node.id, status, directory);
        }

        Ok(response.json::<PhotoResponse>().await?)
    }
}
