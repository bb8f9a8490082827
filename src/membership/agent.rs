//! Worker-side self registration.
//!
//! A worker process runs a `RegistrationAgent` pointed at the master. The agent
//! re-sends the worker's descriptor every cycle, so a master that restarted
//! with an empty or stale snapshot relearns its workers without operator action.

use super::types::WorkerNode;

use anyhow::{Result, bail};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

pub const ENDPOINT_REGISTER: &str = "/register";
pub const ENDPOINT_LIST_NODES: &str = "/registeredslaves";

pub const REGISTER_INTERVAL: Duration = Duration::from_secs(30);
const REGISTER_TIMEOUT: Duration = Duration::from_secs(5);
const REGISTER_ATTEMPTS: usize = 3;

pub struct RegistrationAgent {
    master_url: String,
    local: WorkerNode,
    interval: Duration,
    http_client: reqwest::Client,
}

impl RegistrationAgent {
    /// `master_url` is the master's base URL, e.g. `http://10.0.0.2:3001`.
    pub fn new(master_url: impl Into<String>, local: WorkerNode) -> Self {
        Self {
            master_url: master_url.into(),
            local,
            interval: REGISTER_INTERVAL,
            http_client: reqwest::Client::new(),
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn start(self: Arc<Self>) -> JoinHandle<()> {
        tokio::spawn(async move {
            loop {
                tracing::info!("Attempt to register to {}", self.master_url);
                match self.register_once().await {
                    Ok(()) => tracing::info!("Registered to {} as {}", self.master_url, self.local.id),
                    Err(e) => tracing::error!("Registration to {} failed: {}", self.master_url, e),
                }

                let jitter = rand::random::<u64>() % 500;
                tokio::time::sleep(self.interval + Duration::from_millis(jitter)).await;
            }
        })
    }

    /// Sends one registration. The master must answer 200 with the JSON
    /// string `"ok"`.
    pub async fn register_once(&self) -> Result<()> {
        let url = format!("{}{}", self.master_url.trim_end_matches('/'), ENDPOINT_REGISTER);
        let response = self
            .post_with_retry(url, &self.local, REGISTER_TIMEOUT, REGISTER_ATTEMPTS)
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            bail!("bad response from master ({}): {}", status, body);
        }
        if body.trim() != "\"ok\"" {
            bail!("unexpected answer from master: {}", body);
        }
        Ok(())
    }

    async fn post_with_retry<T: serde::Serialize>(
        &self,
        url: String,
        payload: &T,
        timeout: Duration,
        attempts: usize,
    ) -> Result<reqwest::Response> {
        let mut delay_ms = 150u64;

        for attempt in 0..attempts {
            let response = self
                .http_client
                .post(url.clone())
                .json(payload)
                .timeout(timeout)
                .send()
                .await;

            match response {
                Ok(resp) => return Ok(resp),
                Err(e) => {
                    if attempt + 1 == attempts {
                        return Err(anyhow::anyhow!(e));
                    }
                    let jitter = rand::random::<u64>() % 50;
                    tokio::time::sleep(Duration::from_millis(delay_ms + jitter)).await;
                    delay_ms = (delay_ms * 2).min(1200);
                }
            }
        }

        Err(anyhow::anyhow!("Registration attempts exhausted"))
    }
}
