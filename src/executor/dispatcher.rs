//! Scan Dispatcher
//!
//! Fans one scan request out to a worker node and fans the answers back into
//! the document store.
//!
//! ## Pipeline
//! 1. The aggregation consumer is spawned first. It is the only writer into
//!    the store for this dispatch and persists each batch as it arrives.
//! 2. `pool_size` workers share one bounded job queue. Each takes a directory,
//!    calls the node's scan endpoint and forwards the decoded batch.
//! 3. Every directory is queued, then the queue is closed.
//! 4. All workers are joined, then the aggregation channel is closed.
//! 5. The consumer is awaited; only then is the scan reported as ended.

use super::client::ScanClient;
use super::types::*;
use crate::activity::ActivityLog;
use crate::membership::service::NodeRegistry;
use crate::membership::types::NodeId;
use crate::storage::store::DocumentStore;

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::sync::mpsc::{self, Receiver, UnboundedReceiver, UnboundedSender};

pub const DEFAULT_POOL_SIZE: usize = 5;

pub struct ScanDispatcher {
    registry: Arc<NodeRegistry>,
    store: Arc<DocumentStore>,
    activity: Arc<ActivityLog>,
    client: ScanClient,
    pool_size: usize,
}

#[derive(Debug, Default)]
struct AggregateTotals {
    failed: usize,
    received: usize,
    inserted: usize,
}

impl ScanDispatcher {
    pub fn new(
        registry: Arc<NodeRegistry>,
        store: Arc<DocumentStore>,
        activity: Arc<ActivityLog>,
        pool_size: usize,
        request_timeout: Duration,
    ) -> Arc<Self> {
        Arc::new(Self {
            registry,
            store,
            activity,
            client: ScanClient::new(request_timeout),
            pool_size: pool_size.max(1),
        })
    }

    /// Starts a dispatch in the background and returns at once. The handle
    /// may be dropped; the dispatch keeps running.
    pub fn dispatch(self: &Arc<Self>, directories: Vec<String>, node_id: &NodeId) -> DispatchHandle {
        let dispatcher = Arc::clone(self);
        let node_id = node_id.clone();
        tokio::spawn(async move { dispatcher.run(directories, node_id).await })
    }

    /// Runs a dispatch to completion.
    pub async fn run(&self, directories: Vec<String>, node_id: NodeId) -> DispatchReport {
        let mut report = DispatchReport {
            node: node_id.clone(),
            directories: directories.len(),
            ..Default::default()
        };

        let Some(node) = self.registry.get(&node_id) else {
            tracing::warn!("Scan requested for unknown node {}, nothing to do", node_id);
            return report;
        };
        if !node.active {
            tracing::warn!("Node {} is flagged inactive, scanning anyway", node_id);
        }

        tracing::info!(
            "Dispatching {} directories to {} with {} workers",
            directories.len(),
            node_id,
            self.pool_size
        );
        report.dispatched = true;

        let (batch_tx, batch_rx) = mpsc::unbounded_channel::<ScanBatch>();
        let consumer = tokio::spawn(aggregate(
            Arc::clone(&self.store),
            node_id.to_string(),
            batch_rx,
        ));

        let (job_tx, job_rx) = mpsc::channel::<ScanJob>(self.pool_size);
        let job_rx = Arc::new(Mutex::new(job_rx));

        let mut workers = Vec::with_capacity(self.pool_size);
        for worker_id in 0..self.pool_size {
            let client = self.client.clone();
            let jobs = Arc::clone(&job_rx);
            let batches = batch_tx.clone();
            workers.push(tokio::spawn(async move {
                worker_loop(worker_id, client, jobs, batches).await;
            }));
        }

        for directory in directories {
            let job = ScanJob {
                directory,
                node: node.clone(),
            };
            if let Err(e) = job_tx.send(job).await {
                tracing::error!("Scan queue closed early, dropping {}", e.0.directory);
            }
        }
        drop(job_tx);

        for (worker_id, worker) in workers.into_iter().enumerate() {
            if let Err(e) = worker.await {
                tracing::error!("Scan worker {} failed: {}", worker_id, e);
            }
        }
        drop(batch_tx);

        match consumer.await {
            Ok(totals) => {
                report.failed_directories = totals.failed;
                report.photos_received = totals.received;
                report.photos_inserted = totals.inserted;
            }
            Err(e) => tracing::error!("Aggregation for {} failed: {}", node_id, e),
        }

        self.activity.post(format!("scan ended for node {}", node_id));
        tracing::info!(
            "Dispatch to {} done: {} photos received, {} new, {} failed directories",
            node_id,
            report.photos_received,
            report.photos_inserted,
            report.failed_directories
        );
        report
    }
}

async fn worker_loop(
    worker_id: usize,
    client: ScanClient,
    jobs: Arc<Mutex<Receiver<ScanJob>>>,
    batches: UnboundedSender<ScanBatch>,
) {
    tracing::debug!("Scan worker {} started", worker_id);

    loop {
        let job = jobs.lock().await.recv().await;
        let Some(job) = job else {
            break;
        };

        let batch = match client.scan_directory(&job.node, &job.directory).await {
            Ok(response) => {
                tracing::debug!(
                    "Worker {} got {} photos for {}",
                    worker_id,
                    response.photos.len(),
                    job.directory
                );
                ScanBatch {
                    directory: job.directory,
                    photos: response.photos,
                    failed: false,
                }
            }
            Err(e) => {
                tracing::warn!("Scan of {} on {} failed: {}", job.directory, job.node.id, e);
                ScanBatch::failed(job.directory)
            }
        };

        if batches.send(batch).is_err() {
            tracing::error!("Aggregation channel closed, worker {} stopping", worker_id);
            break;
        }
    }

    tracing::debug!("Scan worker {} finished", worker_id);
}

async fn aggregate(
    store: Arc<DocumentStore>,
    origin: String,
    mut batches: UnboundedReceiver<ScanBatch>,
) -> AggregateTotals {
    let mut totals = AggregateTotals::default();

    while let Some(batch) = batches.recv().await {
        if batch.failed {
            totals.failed += 1;
        }
        if batch.photos.is_empty() {
            continue;
        }

        totals.received += batch.photos.len();
        match store.insert_new_data(&batch.photos, &origin).await {
            Ok(inserted) => totals.inserted += inserted,
            Err(e) => tracing::error!("Failed to store scan of {}: {}", batch.directory, e),
        }
    }
    totals
}
