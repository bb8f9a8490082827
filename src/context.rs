//! Core Context
//!
//! The registry, the document store, the dispatcher and the action history
//! are built once, here, and shared by reference. `CoreContext` is also the
//! surface API handlers call: every photo list it hands out has already gone
//! through `reduce`.

use crate::activity::{ActivityEntry, ActivityLog, HISTORY_CAPACITY};
use crate::config::AppConfig;
use crate::error::Result;
use crate::executor::dispatcher::ScanDispatcher;
use crate::executor::types::DispatchHandle;
use crate::membership::service::NodeRegistry;
use crate::membership::types::{NodeId, WorkerNode};
use crate::search::reduce::{SizeClass, reduce};
use crate::storage::store::DocumentStore;
use crate::storage::types::*;

use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::task::JoinHandle;

pub struct CoreContext {
    pub config: AppConfig,
    pub registry: Arc<NodeRegistry>,
    pub store: Arc<DocumentStore>,
    pub dispatcher: Arc<ScanDispatcher>,
    pub activity: Arc<ActivityLog>,
}

impl CoreContext {
    /// Validates the configuration, loads the registry and opens the store.
    /// Call once per process.
    pub async fn open(config: AppConfig) -> Result<Arc<Self>> {
        config.validate()?;

        let registry = NodeRegistry::load(&config.registry_path).await?;
        let store = DocumentStore::open(&config.database_path).await?;
        let activity = Arc::new(ActivityLog::new(HISTORY_CAPACITY));
        let dispatcher = ScanDispatcher::new(
            Arc::clone(&registry),
            Arc::clone(&store),
            Arc::clone(&activity),
            config.scan_workers,
            config.request_timeout(),
        );

        Ok(Arc::new(Self {
            config,
            registry,
            store,
            dispatcher,
            activity,
        }))
    }

    // Nodes

    pub async fn register_node(&self, node: WorkerNode) -> Result<()> {
        self.registry.register(node).await
    }

    pub fn list_nodes(&self) -> Vec<WorkerNode> {
        self.registry.list()
    }

    /// Accepts a scan of `directories` on `node_id`; the work runs in the
    /// background.
    pub fn dispatch(&self, directories: Vec<String>, node_id: &NodeId) -> DispatchHandle {
        self.activity.post(format!(
            "calling scan folders for machineid {} ({} folders)",
            node_id,
            directories.len()
        ));
        self.dispatcher.dispatch(directories, node_id)
    }

    // Queries

    pub async fn query_all(&self, size: SizeClass) -> Vec<PhotoRecord> {
        reduce(self.store.query_all().await, size)
    }

    pub async fn query_by_filename(&self, pattern: &str, size: SizeClass) -> Vec<PhotoRecord> {
        reduce(self.store.query_by_filename(pattern).await, size)
    }

    pub async fn query_by_extension(&self, pattern: &str, size: SizeClass) -> Vec<PhotoRecord> {
        reduce(self.store.query_by_extension(pattern).await, size)
    }

    pub async fn query_by_exif_tag(
        &self,
        pattern: &str,
        tag_name: &str,
        size: SizeClass,
    ) -> Vec<PhotoRecord> {
        reduce(self.store.query_by_exif_tag(pattern, tag_name).await, size)
    }

    // Albums

    pub async fn create_album(&self, album: AlbumRecord) -> Result<()> {
        self.store.insert_new_album(album).await
    }

    pub async fn update_album(&self, album: AlbumRecord) -> Result<()> {
        self.store.update_album(album).await
    }

    pub async fn delete_album(&self, name: &str) -> Result<()> {
        self.store.delete_album(name).await
    }

    pub async fn get_album(&self, name: &str) -> Result<AlbumRecord> {
        self.store.get_album(name).await
    }

    pub async fn list_albums(&self) -> Vec<AlbumRecord> {
        self.store.list_albums().await
    }

    pub async fn remove_photos_from_album(&self, name: &str, hashes: &[String]) -> Result<()> {
        self.store.delete_photos_from_album(name, hashes).await
    }

    pub async fn export_album(
        &self,
        name: &str,
        selection: &[String],
        size: SizeClass,
    ) -> Result<Vec<PhotoRecord>> {
        self.store.export_selection(name, selection, size).await
    }

    // Aggregates

    pub async fn origin_stats(&self) -> BTreeMap<String, usize> {
        self.store.origin_stats().await
    }

    pub async fn location_stats(&self) -> Vec<LocationBucket> {
        self.store.location_stats().await
    }

    pub async fn time_stats(&self, groupby: &str) -> Vec<TimeBucket> {
        self.store.time_stats(groupby).await
    }

    pub async fn photos_near(&self, latitude: f64, longitude: f64, size: SizeClass) -> Vec<PhotoRecord> {
        reduce(self.store.photos_from_coordinates(latitude, longitude).await, size)
    }

    pub async fn photos_at(&self, date: &str, groupby: &str, size: SizeClass) -> Vec<PhotoRecord> {
        reduce(self.store.photos_from_time(date, groupby).await, size)
    }

    // Maintenance

    /// Starts a cleanup pass in the background.
    pub fn clean_database(self: &Arc<Self>) -> JoinHandle<Result<CleanReport>> {
        let ctx = Arc::clone(self);
        self.activity.post("database cleanup started");

        tokio::spawn(async move {
            let result = ctx.store.clean_database(&ctx.registry).await;
            match &result {
                Ok(report) => ctx.activity.post(format!(
                    "database cleanup ended, {} record(s) removed",
                    report.total()
                )),
                Err(e) => {
                    tracing::error!("Database cleanup failed: {}", e);
                    ctx.activity.post("database cleanup failed");
                }
            }
            result
        })
    }

    pub fn history(&self) -> Vec<ActivityEntry> {
        self.activity.recent()
    }
}
