use crate::error::Result;
use crate::storage::persist::write_atomic;

use dashmap::DashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

use super::types::{NodeId, RegistrySnapshot, WorkerNode};

/// Directory of known worker nodes, mirrored to a snapshot file.
///
/// Reads go straight to the map and never wait on a writer. Every mutation
/// takes `write_lock`, writes the snapshot with the change applied and only
/// then applies it to the map: a failed write leaves the registry as it was,
/// and two registrations racing each other both end up in the file.
pub struct NodeRegistry {
    nodes: DashMap<NodeId, WorkerNode>,
    snapshot_path: PathBuf,
    write_lock: Mutex<()>,
}

impl NodeRegistry {
    /// Loads the snapshot at `path`. A missing file starts an empty registry;
    /// an unreadable one is logged and also starts empty, since workers
    /// re-register periodically.
    pub async fn load(path: impl Into<PathBuf>) -> Result<Arc<Self>> {
        let snapshot_path = path.into();
        let nodes = DashMap::new();

        match tokio::fs::read(&snapshot_path).await {
            Ok(bytes) => match serde_json::from_slice::<RegistrySnapshot>(&bytes) {
                Ok(snapshot) => {
                    for (id, node) in snapshot.slaves {
                        nodes.insert(id, node);
                    }
                    info!(
                        "Loaded {} worker node(s) from {}",
                        nodes.len(),
                        snapshot_path.display()
                    );
                }
                Err(e) => {
                    tracing::warn!(
                        "Ignoring corrupt registry snapshot {}: {}",
                        snapshot_path.display(),
                        e
                    );
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("No registry snapshot at {}, starting empty", snapshot_path.display());
            }
            Err(e) => return Err(e.into()),
        }

        Ok(Arc::new(Self {
            nodes,
            snapshot_path,
            write_lock: Mutex::new(()),
        }))
    }

    /// Inserts or replaces the entry for `node.id`.
    ///
    /// Re-registration overwrites the previous entry, including its liveness
    /// flag. The entry becomes visible only once the snapshot holding it is on
    /// disk.
    pub async fn register(&self, node: WorkerNode) -> Result<()> {
        let _guard = self.write_lock.lock().await;

        info!(
            "Registering worker {} at {} (scan path {})",
            node.id,
            node.base_url(),
            node.scan_path
        );
        let mut snapshot = self.snapshot();
        snapshot.slaves.insert(node.id.clone(), node.clone());
        self.persist_locked(&snapshot).await?;

        self.nodes.insert(node.id.clone(), node);
        Ok(())
    }

    /// All known nodes, ordered by identity.
    pub fn list(&self) -> Vec<WorkerNode> {
        let mut nodes: Vec<WorkerNode> = self
            .nodes
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        nodes.sort_by(|a, b| a.id.cmp(&b.id));
        nodes
    }

    pub fn get(&self, id: &NodeId) -> Option<WorkerNode> {
        self.nodes.get(id).map(|entry| entry.value().clone())
    }

    /// `true` when the node is registered and not flagged inactive.
    pub fn is_active(&self, id: &NodeId) -> bool {
        self.nodes
            .get(id)
            .map(|entry| entry.value().active)
            .unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Updates the liveness flag. Returns whether anything changed; the
    /// snapshot is only rewritten on change.
    pub async fn set_active(&self, id: &NodeId, active: bool) -> Result<bool> {
        let _guard = self.write_lock.lock().await;

        let Some(mut node) = self.get(id) else {
            return Ok(false);
        };
        if node.active == active {
            return Ok(false);
        }
        node.active = active;

        let mut snapshot = self.snapshot();
        snapshot.slaves.insert(id.clone(), node.clone());
        self.persist_locked(&snapshot).await?;
        self.nodes.insert(id.clone(), node);

        if active {
            info!("Worker {} is reachable again", id);
        } else {
            tracing::warn!("Worker {} marked inactive", id);
        }
        Ok(true)
    }

    /// Drops a node from the registry.
    pub async fn remove(&self, id: &NodeId) -> Result<Option<WorkerNode>> {
        let _guard = self.write_lock.lock().await;

        if !self.nodes.contains_key(id) {
            return Ok(None);
        }
        let mut snapshot = self.snapshot();
        snapshot.slaves.remove(id);
        self.persist_locked(&snapshot).await?;

        let removed = self.nodes.remove(id).map(|(_, node)| node);
        info!("Removed worker {} from registry", id);
        Ok(removed)
    }

    fn snapshot(&self) -> RegistrySnapshot {
        RegistrySnapshot {
            slaves: self
                .nodes
                .iter()
                .map(|entry| (entry.key().clone(), entry.value().clone()))
                .collect(),
        }
    }

    // Caller must hold `write_lock`.
    async fn persist_locked(&self, snapshot: &RegistrySnapshot) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(snapshot)?;
        if let Err(e) = write_atomic(&self.snapshot_path, &bytes).await {
            tracing::error!(
                "Failed to persist registry to {}: {}",
                self.snapshot_path.display(),
                e
            );
            return Err(e);
        }
        tracing::debug!("Registry snapshot written ({} nodes)", snapshot.slaves.len());
        Ok(())
    }
}
