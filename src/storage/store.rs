use super::index::{AlbumIndex, PhotoIndex};
use super::persist::{ALBUMS_FILE, PHOTOS_FILE, encode_lines, read_lines, write_atomic};
use super::query::Predicate;
use super::types::*;
use crate::error::{CoreError, Result};
use crate::executor::protocol::ScannedPhoto;
use crate::exif::Coordinates;
use crate::membership::service::NodeRegistry;
use crate::membership::types::NodeId;
use crate::search::reduce::{SizeClass, reduce};

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::info;

/// Most photos a single export may select.
pub const EXPORT_LIMIT: usize = 150;

#[derive(Default)]
struct PhotoCollection {
    records: BTreeMap<DocId, PhotoRecord>,
    next_id: DocId,
    index: PhotoIndex,
}

impl PhotoCollection {
    fn from_records(records: Vec<PhotoRecord>) -> Self {
        let mut collection = Self::default();
        for record in records {
            collection.push(record);
        }
        collection
    }

    fn push(&mut self, record: PhotoRecord) -> DocId {
        let id = self.next_id;
        self.next_id += 1;
        self.index.insert(id, &record);
        self.records.insert(id, record);
        id
    }

    fn select(&self, predicate: &Predicate) -> Vec<PhotoRecord> {
        match self.index.candidates(predicate) {
            Some(ids) => ids
                .iter()
                .filter_map(|id| self.records.get(id))
                .filter(|record| predicate.matches(record))
                .cloned()
                .collect(),
            None => self
                .records
                .values()
                .filter(|record| predicate.matches(record))
                .cloned()
                .collect(),
        }
    }
}

#[derive(Default)]
struct AlbumCollection {
    records: BTreeMap<DocId, AlbumRecord>,
    next_id: DocId,
    index: AlbumIndex,
}

impl AlbumCollection {
    fn from_records(records: Vec<AlbumRecord>) -> Self {
        let mut collection = Self::default();
        for record in records {
            collection.push(record);
        }
        collection
    }

    fn push(&mut self, record: AlbumRecord) -> DocId {
        let id = self.next_id;
        self.next_id += 1;
        self.index.insert(id, &record.name);
        self.records.insert(id, record);
        id
    }

    fn get(&self, name: &str) -> Option<&AlbumRecord> {
        let id = self.index.id_of(name)?;
        self.records.get(&id)
    }
}

/// Content-addressed store for photo and album records.
///
/// Each collection sits behind its own `RwLock` and has its own writer
/// mutex. A mutation holds the writer mutex from start to finish: it builds
/// the next state, writes it to disk, and only then takes the write guard to
/// swap it in. Queries therefore wait for the swap, never for the disk, and a
/// failed write leaves memory untouched.
pub struct DocumentStore {
    root: PathBuf,
    photos: RwLock<PhotoCollection>,
    albums: RwLock<AlbumCollection>,
    photos_writer: Mutex<()>,
    albums_writer: Mutex<()>,
}

impl DocumentStore {
    /// Opens (or creates) the store rooted at `database_path`.
    pub async fn open(database_path: impl AsRef<Path>) -> Result<Arc<Self>> {
        let root = database_path.as_ref().to_path_buf();
        if root.as_os_str().is_empty() {
            return Err(CoreError::Config("database path is empty".to_string()));
        }
        tokio::fs::create_dir_all(&root).await?;

        let photos = PhotoCollection::from_records(read_lines(&root.join(PHOTOS_FILE)).await?);
        let albums = AlbumCollection::from_records(read_lines(&root.join(ALBUMS_FILE)).await?);
        info!(
            "Opened document store at {} ({} photos, {} albums)",
            root.display(),
            photos.records.len(),
            albums.records.len()
        );

        Ok(Arc::new(Self {
            root,
            photos: RwLock::new(photos),
            albums: RwLock::new(albums),
            photos_writer: Mutex::new(()),
            albums_writer: Mutex::new(()),
        }))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub async fn photo_count(&self) -> usize {
        self.photos.read().await.records.len()
    }

    pub async fn album_count(&self) -> usize {
        self.albums.read().await.records.len()
    }

    // ============================================================
    // PHOTOS
    // ============================================================

    /// Inserts the photos of one scan batch on behalf of `origin`.
    ///
    /// A hash already in the store is skipped, never overwritten. Returns the
    /// number of records actually added.
    pub async fn insert_new_data(&self, batch: &[ScannedPhoto], origin: &str) -> Result<usize> {
        let _writer = self.photos_writer.lock().await;

        let (fresh, snapshot) = {
            let photos = self.photos.read().await;
            let mut seen = HashSet::new();
            let mut fresh = Vec::new();
            for photo in batch {
                if photo.md5sum.is_empty() {
                    tracing::warn!(
                        "Cannot insert {} from {}: missing content hash",
                        photo.filepath,
                        origin
                    );
                    continue;
                }
                if photos.index.contains_hash(&photo.md5sum) || !seen.insert(photo.md5sum.as_str()) {
                    tracing::debug!("Photo {} already indexed, skipping", photo.md5sum);
                    continue;
                }
                fresh.push(PhotoRecord::from_scanned(photo, origin));
            }
            if fresh.is_empty() {
                return Ok(0);
            }
            let snapshot = encode_lines(photos.records.values().chain(fresh.iter()))?;
            (fresh, snapshot)
        };
        self.write_collection(PHOTOS_FILE, &snapshot).await?;

        let inserted = fresh.len();
        let mut photos = self.photos.write().await;
        for record in fresh {
            tracing::debug!("Storing {} from {}", record.filepath, origin);
            photos.push(record);
        }
        info!("Inserted {} new photo(s) from {}", inserted, origin);
        Ok(inserted)
    }

    /// Records matching `predicate`, in insertion order.
    pub async fn query(&self, predicate: &Predicate) -> Vec<PhotoRecord> {
        self.photos.read().await.select(predicate)
    }

    pub async fn query_all(&self) -> Vec<PhotoRecord> {
        self.query(&Predicate::All).await
    }

    pub async fn query_by_filename(&self, pattern: &str) -> Vec<PhotoRecord> {
        self.query(&Predicate::filename(pattern)).await
    }

    pub async fn query_by_extension(&self, pattern: &str) -> Vec<PhotoRecord> {
        self.query(&Predicate::extension(pattern)).await
    }

    pub async fn query_by_exif_tag(&self, pattern: &str, tag_name: &str) -> Vec<PhotoRecord> {
        self.query(&Predicate::exif_tag(tag_name, pattern)).await
    }

    /// Records for `hashes`, in the order asked. Unknown hashes are skipped.
    pub async fn photos_by_hashes(&self, hashes: &[String]) -> Vec<PhotoRecord> {
        let photos = self.photos.read().await;
        hashes
            .iter()
            .filter_map(|hash| photos.index.id_of(hash))
            .filter_map(|id| photos.records.get(&id).cloned())
            .collect()
    }

    // ============================================================
    // AGGREGATES
    // ============================================================

    pub async fn origin_stats(&self) -> BTreeMap<String, usize> {
        let photos = self.photos.read().await;
        let mut stats = BTreeMap::new();
        for record in photos.records.values() {
            *stats.entry(record.origin.clone()).or_insert(0) += 1;
        }
        stats
    }

    /// Photo count per rounded position, in order of first appearance.
    /// Photos without a position are left out.
    pub async fn location_stats(&self) -> Vec<LocationBucket> {
        let photos = self.photos.read().await;
        let mut buckets: Vec<LocationBucket> = Vec::new();

        for record in photos.records.values() {
            let coords = record.coordinates();
            if coords.is_absent() {
                continue;
            }
            match buckets
                .iter_mut()
                .find(|b| b.latitude == coords.latitude && b.longitude == coords.longitude)
            {
                Some(bucket) => bucket.count += 1,
                None => buckets.push(LocationBucket {
                    latitude: coords.latitude,
                    longitude: coords.longitude,
                    count: 1,
                }),
            }
        }
        buckets
    }

    /// Photos taken at `(latitude, longitude)`, compared at normalization
    /// precision.
    pub async fn photos_from_coordinates(&self, latitude: f64, longitude: f64) -> Vec<PhotoRecord> {
        let target = Coordinates::rounded(latitude, longitude);
        if target.is_absent() {
            return Vec::new();
        }

        let photos = self.photos.read().await;
        photos
            .records
            .values()
            .filter(|record| record.coordinates() == target)
            .cloned()
            .collect()
    }

    /// Photo count per date bucket, sorted by date. Undated photos are left out.
    pub async fn time_stats(&self, groupby: &str) -> Vec<TimeBucket> {
        let photos = self.photos.read().await;
        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        for record in photos.records.values() {
            let bucket = record.date_bucket(groupby);
            if !bucket.is_empty() {
                *counts.entry(bucket).or_insert(0) += 1;
            }
        }
        counts
            .into_iter()
            .map(|(date, count)| TimeBucket { date, count })
            .collect()
    }

    pub async fn photos_from_time(&self, date: &str, groupby: &str) -> Vec<PhotoRecord> {
        let date = date.trim();
        if date.is_empty() {
            return Vec::new();
        }

        let photos = self.photos.read().await;
        photos
            .records
            .values()
            .filter(|record| record.date_bucket(groupby) == date)
            .cloned()
            .collect()
    }

    // ============================================================
    // ALBUMS
    // ============================================================

    /// Creates an album, or merges into the existing album of that name.
    pub async fn insert_new_album(&self, album: AlbumRecord) -> Result<()> {
        self.commit_albums(|albums| {
            match albums.iter_mut().find(|existing| existing.name == album.name) {
                Some(existing) => {
                    info!("Album {} exists, merging", album.name);
                    apply_update(existing, album);
                }
                None => {
                    info!("Creating album {} with {} photo(s)", album.name, album.hashes.len());
                    let mut fresh = AlbumRecord {
                        name: album.name,
                        description: album.description,
                        tags: album.tags,
                        hashes: Vec::with_capacity(album.hashes.len()),
                    };
                    fresh.merge_hashes(album.hashes);
                    albums.push(fresh);
                }
            }
            Ok(())
        })
        .await
    }

    /// Merges hashes into an existing album and replaces its tags and
    /// description.
    pub async fn update_album(&self, album: AlbumRecord) -> Result<()> {
        self.commit_albums(|albums| {
            let Some(existing) = albums.iter_mut().find(|existing| existing.name == album.name) else {
                return Err(CoreError::NotFound(format!("album {}", album.name)));
            };
            apply_update(existing, album);
            Ok(())
        })
        .await
    }

    pub async fn delete_album(&self, name: &str) -> Result<()> {
        self.commit_albums(|albums| {
            let before = albums.len();
            albums.retain(|album| album.name != name);
            if albums.len() == before {
                return Err(CoreError::NotFound(format!("album {}", name)));
            }
            info!("Deleted album {}", name);
            Ok(())
        })
        .await
    }

    /// Removes `hashes` from the album. The photo records themselves stay.
    pub async fn delete_photos_from_album(&self, name: &str, hashes: &[String]) -> Result<()> {
        self.commit_albums(|albums| {
            let Some(album) = albums.iter_mut().find(|album| album.name == name) else {
                return Err(CoreError::NotFound(format!("album {}", name)));
            };
            let before = album.hashes.len();
            album.hashes.retain(|hash| !hashes.contains(hash));
            info!(
                "Removed {} photo(s) from album {}",
                before - album.hashes.len(),
                name
            );
            Ok(())
        })
        .await
    }

    pub async fn get_album(&self, name: &str) -> Result<AlbumRecord> {
        self.albums
            .read()
            .await
            .get(name)
            .cloned()
            .ok_or_else(|| CoreError::NotFound(format!("album {}", name)))
    }

    pub async fn list_albums(&self) -> Vec<AlbumRecord> {
        self.albums.read().await.records.values().cloned().collect()
    }

    /// Photos of an album selected for export.
    ///
    /// An empty `selection` means the whole album; otherwise only the listed
    /// hashes that belong to the album are kept, in the order given. The
    /// selection is capped at `EXPORT_LIMIT` before reduction.
    pub async fn export_selection(
        &self,
        name: &str,
        selection: &[String],
        size: SizeClass,
    ) -> Result<Vec<PhotoRecord>> {
        let album = self.get_album(name).await?;

        let hashes: Vec<String> = if selection.is_empty() {
            album.hashes
        } else {
            selection
                .iter()
                .filter(|hash| album.hashes.contains(hash))
                .cloned()
                .collect()
        };
        if hashes.len() > EXPORT_LIMIT {
            return Err(CoreError::ExportTooLarge {
                selected: hashes.len(),
                limit: EXPORT_LIMIT,
            });
        }

        Ok(reduce(self.photos_by_hashes(&hashes).await, size))
    }

    // ============================================================
    // MAINTENANCE
    // ============================================================

    /// Removes orphaned photos (no origin, or an origin the registry flags
    /// inactive), then duplicate photos by hash and duplicate albums by name,
    /// keeping the first of each. Ids are compacted and both collections
    /// rewritten.
    pub async fn clean_database(&self, registry: &NodeRegistry) -> Result<CleanReport> {
        let _writer = self.photos_writer.lock().await;
        let mut report = CleanReport::default();

        let (removed, snapshot) = {
            let photos = self.photos.read().await;
            let mut seen_hashes = HashSet::new();
            let mut removed = HashSet::new();
            for (id, record) in &photos.records {
                if is_orphan(record, registry) {
                    info!("Removing orphan photo {} (origin {:?})", record.md5sum, record.origin);
                    report.orphan_photos += 1;
                    removed.insert(*id);
                } else if !seen_hashes.insert(record.md5sum.as_str()) {
                    info!("Removing duplicate photo {}", record.md5sum);
                    report.duplicate_photos += 1;
                    removed.insert(*id);
                }
            }
            let kept = photos
                .records
                .iter()
                .filter(|(id, _)| !removed.contains(*id))
                .map(|(_, record)| record);
            let snapshot = encode_lines(kept)?;
            (removed, snapshot)
        };
        self.write_collection(PHOTOS_FILE, &snapshot).await?;
        {
            let mut photos = self.photos.write().await;
            let kept: Vec<PhotoRecord> = std::mem::take(&mut photos.records)
                .into_iter()
                .filter(|(id, _)| !removed.contains(id))
                .map(|(_, record)| record)
                .collect();
            *photos = PhotoCollection::from_records(kept);
        }

        report.duplicate_albums = self
            .commit_albums(|albums| {
                let before = albums.len();
                let mut seen_names = HashSet::new();
                albums.retain(|album| {
                    let first = seen_names.insert(album.name.clone());
                    if !first {
                        info!("Removing duplicate album {}", album.name);
                    }
                    first
                });
                Ok(before - albums.len())
            })
            .await?;

        info!(
            "Cleanup done: {} orphan(s), {} duplicate photo(s), {} duplicate album(s)",
            report.orphan_photos, report.duplicate_photos, report.duplicate_albums
        );
        Ok(report)
    }

    /// Applies `change` to a copy of the album list, writes the result and
    /// swaps it in. An `Err` from `change` or from the write leaves the
    /// collection as it was.
    async fn commit_albums<R>(
        &self,
        change: impl FnOnce(&mut Vec<AlbumRecord>) -> Result<R>,
    ) -> Result<R> {
        let _writer = self.albums_writer.lock().await;

        let mut records: Vec<AlbumRecord> =
            self.albums.read().await.records.values().cloned().collect();
        let outcome = change(&mut records)?;

        let snapshot = encode_lines(&records)?;
        self.write_collection(ALBUMS_FILE, &snapshot).await?;

        *self.albums.write().await = AlbumCollection::from_records(records);
        Ok(outcome)
    }

    async fn write_collection(&self, file: &str, snapshot: &[u8]) -> Result<()> {
        let path = self.root.join(file);
        write_atomic(&path, snapshot)
            .await
            .inspect_err(|e| tracing::error!("Failed to write {}: {}", path.display(), e))
    }
}

fn apply_update(existing: &mut AlbumRecord, update: AlbumRecord) {
    existing.merge_hashes(update.hashes);
    existing.tags = update.tags;
    existing.description = update.description;
}

fn is_orphan(record: &PhotoRecord, registry: &NodeRegistry) -> bool {
    if record.origin.is_empty() {
        return true;
    }
    registry
        .get(&NodeId(record.origin.clone()))
        .is_some_and(|node| !node.active)
}
