use super::service::NodeRegistry;
use super::types::WorkerNode;

use std::sync::Arc;
use std::time::Duration;
use tokio::task::{JoinHandle, JoinSet};

/// Periodically probes every registered worker and keeps its `active` flag
/// in line with reachability.
///
/// Any HTTP response counts as alive; only transport failures (refused,
/// timed out, unresolvable) mark a node inactive. Inactive nodes stay in the
/// registry, their photos become eligible for cleanup.
pub struct LivenessMonitor {
    registry: Arc<NodeRegistry>,
    http_client: reqwest::Client,
    interval: Duration,
    probe_timeout: Duration,
}

impl LivenessMonitor {
    pub fn new(registry: Arc<NodeRegistry>, interval: Duration, probe_timeout: Duration) -> Arc<Self> {
        Arc::new(Self {
            registry,
            http_client: reqwest::Client::new(),
            interval,
            probe_timeout,
        })
    }

    pub fn start(self: Arc<Self>) -> JoinHandle<()> {
        tracing::info!("Starting liveness monitor (every {:?})", self.interval);

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(self.interval);
            loop {
                interval.tick().await;
                let changed = self.probe_all().await;
                if changed > 0 {
                    tracing::info!("Liveness sweep changed {} node(s)", changed);
                }
            }
        })
    }

    /// Probes all nodes concurrently and applies the results.
    /// Returns how many nodes changed state.
    pub async fn probe_all(&self) -> usize {
        let mut probes = JoinSet::new();
        for node in self.registry.list() {
            let client = self.http_client.clone();
            let timeout = self.probe_timeout;
            probes.spawn(async move {
                let reachable = probe(&client, &node, timeout).await;
                (node, reachable)
            });
        }

        let mut changed = 0;
        while let Some(joined) = probes.join_next().await {
            let (node, reachable) = match joined {
                Ok(result) => result,
                Err(e) => {
                    tracing::error!("Liveness probe task failed: {}", e);
                    continue;
                }
            };

            match self.registry.set_active(&node.id, reachable).await {
                Ok(true) => changed += 1,
                Ok(false) => {}
                Err(e) => tracing::error!("Failed to record liveness of {}: {}", node.id, e),
            }
        }
        changed
    }
}

async fn probe(client: &reqwest::Client, node: &WorkerNode, timeout: Duration) -> bool {
    let url = format!("{}/", node.base_url());
    match client.get(&url).timeout(timeout).send().await {
        Ok(_) => true,
        Err(e) => {
            tracing::debug!("Probe of {} at {} failed: {}", node.id, url, e);
            false
        }
    }
}
