use super::protocol::ScannedPhoto;
use crate::membership::types::{NodeId, WorkerNode};

use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;

/// One directory to scan on one worker. Lives only for the duration of a
/// dispatch.
#[derive(Debug, Clone)]
pub struct ScanJob {
    pub directory: String,
    pub node: WorkerNode,
}

/// What a pool worker forwards to the aggregation consumer for one job.
/// A failed scan travels as an empty batch with `failed` set.
#[derive(Debug, Clone)]
pub struct ScanBatch {
    pub directory: String,
    pub photos: Vec<ScannedPhoto>,
    pub failed: bool,
}

impl ScanBatch {
    pub fn failed(directory: String) -> Self {
        Self {
            directory,
            photos: Vec::new(),
            failed: true,
        }
    }
}

/// Outcome of one dispatch, available once both the pool and the consumer
/// have drained.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DispatchReport {
    pub node: NodeId,
    pub directories: usize,
    pub failed_directories: usize,
    pub photos_received: usize,
    pub photos_inserted: usize,
    /// `false` when the node was unknown and nothing was attempted.
    pub dispatched: bool,
}

pub type DispatchHandle = JoinHandle<DispatchReport>;
