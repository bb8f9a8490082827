//! Storage Module Tests
//!
//! ## Test Scopes
//! - **Photos**: idempotent inserts, indexed queries, persistence and reload.
//! - **Aggregates**: origin, location and time grouping over normalized EXIF values.
//! - **Albums**: create-or-merge, not-found conditions, concurrent merges, export.
//! - **Maintenance**: orphan and duplicate removal, undecodable lines.
//! - **Failed writes**: a mutation whose file write fails leaves no trace in memory.

#[cfg(test)]
mod tests {
    use crate::error::CoreError;
    use crate::executor::protocol::ScannedPhoto;
    use crate::exif::ExifTags;
    use crate::membership::service::NodeRegistry;
    use crate::membership::types::{NodeId, WorkerNode};
    use crate::search::reduce::SizeClass;
    use crate::storage::persist::{ALBUMS_FILE, PHOTOS_FILE, temp_path_for};
    use crate::storage::query::{Field, Predicate};
    use crate::storage::store::{DocumentStore, EXPORT_LIMIT};
    use crate::storage::types::{AlbumRecord, PhotoRecord};

    use std::sync::Arc;
    use tempfile::TempDir;

    fn scanned(md5sum: &str, filepath: &str, tags: &[(&str, &str)]) -> ScannedPhoto {
        let filename = filepath.rsplit('/').next().unwrap_or(filepath).to_string();
        ScannedPhoto {
            filename,
            filepath: filepath.to_string(),
            md5sum: md5sum.to_string(),
            tags: tags.iter().map(|(k, v)| (*k, *v)).collect::<ExifTags>(),
            thumbnail: String::new(),
        }
    }

    fn with_thumbnail(mut photo: ScannedPhoto, len: usize) -> ScannedPhoto {
        photo.thumbnail = "t".repeat(len);
        photo
    }

    fn album(name: &str, hashes: &[&str]) -> AlbumRecord {
        AlbumRecord {
            name: name.to_string(),
            description: String::new(),
            tags: Vec::new(),
            hashes: hashes.iter().map(|h| h.to_string()).collect(),
        }
    }

    async fn open_store(dir: &TempDir) -> Arc<DocumentStore> {
        DocumentStore::open(dir.path().join("db")).await.unwrap()
    }

    fn hashes(records: &[PhotoRecord]) -> Vec<&str> {
        records.iter().map(|r| r.md5sum.as_str()).collect()
    }

    // ============================================================
    // TEST 1: Opening
    // ============================================================

    #[tokio::test]
    async fn test_open_rejects_empty_path() {
        let result = DocumentStore::open("").await;

        assert!(matches!(result, Err(CoreError::Config(_))));
    }

    // ============================================================
    // TEST 2: Idempotent insert
    // ============================================================

    #[tokio::test]
    async fn test_insert_same_hash_twice_is_noop() {
        // ARRANGE
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir).await;
        let photo = scanned("h1", "/photos/a.jpg", &[]);

        // ACT
        let first = store.insert_new_data(&[photo.clone()], "m1").await.unwrap();
        let mut moved = photo.clone();
        moved.filepath = "/elsewhere/a.jpg".to_string();
        let second = store.insert_new_data(&[moved], "m2").await.unwrap();

        // ASSERT
        assert_eq!(first, 1);
        assert_eq!(second, 0);
        let all = store.query_all().await;
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].filepath, "/photos/a.jpg");
        assert_eq!(all[0].origin, "m1");
    }

    #[tokio::test]
    async fn test_insert_dedups_within_batch_and_skips_missing_hash() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir).await;

        let inserted = store
            .insert_new_data(
                &[
                    scanned("h1", "/p/a.jpg", &[]),
                    scanned("h1", "/p/a-copy.jpg", &[]),
                    scanned("", "/p/nohash.jpg", &[]),
                ],
                "m1",
            )
            .await
            .unwrap();

        assert_eq!(inserted, 1);
        assert_eq!(store.photo_count().await, 1);
    }

    #[tokio::test]
    async fn test_records_carry_derived_fields() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir).await;

        store
            .insert_new_data(&[scanned("h1", "/p/IMG_01.JPG", &[("Model", "X")])], "m1")
            .await
            .unwrap();

        let record = &store.query_all().await[0];
        assert_eq!(record.file_type, ".jpg");
        assert_eq!(record.filename, "IMG_01.JPG");
        assert_eq!(record.exif.get("Model"), Some("X"));
    }

    // ============================================================
    // TEST 3: Queries
    // ============================================================

    #[tokio::test]
    async fn test_query_by_filename_matches_name_and_path_tokens() {
        // ARRANGE
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir).await;
        store
            .insert_new_data(
                &[
                    scanned("h1", "/home/jane/Holidays/beach-sunset.jpg", &[]),
                    scanned("h2", "/home/jane/work/sunset_report.png", &[]),
                    scanned("h3", "/home/jane/holidays/mountain.jpg", &[]),
                    scanned("h4", "/home/bob/cat.gif", &[]),
                ],
                "m1",
            )
            .await
            .unwrap();

        // ACT
        let sunset = store.query_by_filename("SUNSET").await;
        let holidays = store.query_by_filename("holi").await;
        let nothing = store.query_by_filename("zebra").await;

        // ASSERT
        assert_eq!(hashes(&sunset), vec!["h1", "h2"]);
        assert_eq!(hashes(&holidays), vec!["h1", "h3"]);
        assert!(nothing.is_empty());
    }

    #[tokio::test]
    async fn test_query_by_extension_normalizes_pattern() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir).await;
        store
            .insert_new_data(
                &[
                    scanned("h1", "/p/a.JPG", &[]),
                    scanned("h2", "/p/b.png", &[]),
                    scanned("h3", "/p/c.jpg", &[]),
                ],
                "m1",
            )
            .await
            .unwrap();

        assert_eq!(hashes(&store.query_by_extension("jpg").await), vec!["h1", "h3"]);
        assert_eq!(hashes(&store.query_by_extension(".PNG").await), vec!["h2"]);
        assert!(store.query_by_extension("gif").await.is_empty());
    }

    #[tokio::test]
    async fn test_query_by_exif_tag_is_case_insensitive() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir).await;
        store
            .insert_new_data(
                &[
                    scanned("h1", "/p/a.jpg", &[("Camera Model", "Pixel 3")]),
                    scanned("h2", "/p/b.jpg", &[("Camera Model", "iPhone X")]),
                    scanned("h3", "/p/c.jpg", &[("Software", "pixel tools")]),
                ],
                "m1",
            )
            .await
            .unwrap();

        let found = store.query_by_exif_tag("PIXEL", "model").await;

        assert_eq!(hashes(&found), vec!["h1"]);
    }

    #[tokio::test]
    async fn test_indexed_and_scanned_queries_agree() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir).await;
        store
            .insert_new_data(
                &[
                    scanned("h1", "/a/red-car.jpg", &[]),
                    scanned("h2", "/b/blue_car.png", &[]),
                    scanned("h3", "/carousel/x.jpg", &[]),
                ],
                "m1",
            )
            .await
            .unwrap();

        let predicate = Predicate::filename("car");
        let indexed = store.query(&predicate).await;
        let scanned_all: Vec<PhotoRecord> = store
            .query_all()
            .await
            .into_iter()
            .filter(|r| predicate.matches(r))
            .collect();

        assert_eq!(indexed, scanned_all);
        assert_eq!(indexed.len(), 3);
        assert_eq!(
            hashes(&store.query(&Predicate::eq(Field::Origin, "m1")).await),
            vec!["h1", "h2", "h3"]
        );
    }

    #[tokio::test]
    async fn test_photos_by_hashes_keeps_request_order() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir).await;
        store
            .insert_new_data(
                &[scanned("h1", "/p/a.jpg", &[]), scanned("h2", "/p/b.jpg", &[])],
                "m1",
            )
            .await
            .unwrap();

        let found = store
            .photos_by_hashes(&["h2".to_string(), "missing".to_string(), "h1".to_string()])
            .await;

        assert_eq!(hashes(&found), vec!["h2", "h1"]);
    }

    // ============================================================
    // TEST 4: Aggregates
    // ============================================================

    #[tokio::test]
    async fn test_origin_stats() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir).await;
        store
            .insert_new_data(
                &[scanned("h1", "/p/a.jpg", &[]), scanned("h2", "/p/b.jpg", &[])],
                "m1",
            )
            .await
            .unwrap();
        store
            .insert_new_data(&[scanned("h3", "/p/c.jpg", &[])], "google")
            .await
            .unwrap();

        let stats = store.origin_stats().await;

        assert_eq!(stats.get("m1"), Some(&2));
        assert_eq!(stats.get("google"), Some(&1));
    }

    #[tokio::test]
    async fn test_location_stats_bucket_across_encodings() {
        // ARRANGE: the same spot in three encodings, a second spot, an undated/unplaced photo
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir).await;
        store
            .insert_new_data(
                &[
                    scanned("h1", "/p/a.jpg", &[("latitude", "28.1"), ("longitude", "-15.4")]),
                    scanned("h2", "/p/b.jpg", &[("latitude", "38.9098"), ("longitude", "1.4401")]),
                    scanned(
                        "h3",
                        "/p/c.jpg",
                        &[("GPS Latitude", "38 deg 54' 35.40\""), ("GPS Longitude", "1 deg 26' 24.00\"")],
                    ),
                    scanned("h4", "/p/d.jpg", &[("Latitude", "38, 54, 35.40"), ("Longitude", "1, 26, 24")]),
                    scanned("h5", "/p/e.jpg", &[("Model", "Pixel")]),
                ],
                "m1",
            )
            .await
            .unwrap();

        // ACT
        let stats = store.location_stats().await;

        // ASSERT
        assert_eq!(stats.len(), 2);
        assert_eq!((stats[0].latitude, stats[0].longitude, stats[0].count), (28.1, -15.4, 1));
        assert_eq!((stats[1].latitude, stats[1].longitude, stats[1].count), (38.91, 1.44, 3));
    }

    #[tokio::test]
    async fn test_photos_from_coordinates_rounds_query() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir).await;
        store
            .insert_new_data(
                &[
                    scanned("h1", "/p/a.jpg", &[("latitude", "38.9098"), ("longitude", "1.4401")]),
                    scanned("h2", "/p/b.jpg", &[("Latitude", "38, 54, 35.40"), ("Longitude", "1, 26, 24")]),
                    scanned("h3", "/p/c.jpg", &[]),
                ],
                "m1",
            )
            .await
            .unwrap();

        let near = store.photos_from_coordinates(38.912, 1.4449).await;
        let origin = store.photos_from_coordinates(0.0, 0.0).await;

        assert_eq!(hashes(&near), vec!["h1", "h2"]);
        assert!(origin.is_empty());
    }

    #[tokio::test]
    async fn test_time_stats_and_photos_from_time() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir).await;
        store
            .insert_new_data(
                &[
                    scanned("h1", "/p/a.jpg", &[("Date and Time (Original)", "2019:07:02 10:00:00")]),
                    scanned("h2", "/p/b.jpg", &[("timestamp", "1563812345000")]),
                    scanned("h3", "/p/c.jpg", &[("Date and Time (Original)", "2018:01:15 08:30:00")]),
                    scanned("h4", "/p/d.jpg", &[]),
                ],
                "m1",
            )
            .await
            .unwrap();

        let by_month = store.time_stats("month").await;
        let by_year = store.time_stats("year").await;
        let july = store.photos_from_time("2019-07-01", "month").await;

        let months: Vec<(&str, usize)> = by_month.iter().map(|b| (b.date.as_str(), b.count)).collect();
        assert_eq!(months, vec![("2018-01-01", 1), ("2019-07-01", 2)]);
        assert_eq!(by_year.len(), 2);
        assert_eq!(hashes(&july), vec!["h1", "h2"]);
        assert!(store.time_stats("week").await.is_empty());
        assert!(store.photos_from_time("", "month").await.is_empty());
    }

    // ============================================================
    // TEST 5: Albums
    // ============================================================

    #[tokio::test]
    async fn test_insert_existing_album_merges() {
        // ARRANGE
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir).await;

        // ACT
        store.insert_new_album(album("X", &["h1"])).await.unwrap();
        let mut second = album("X", &["h2", "h1"]);
        second.description = "trip".to_string();
        second.tags = vec!["summer".to_string()];
        store.insert_new_album(second).await.unwrap();

        // ASSERT
        let albums = store.list_albums().await;
        assert_eq!(albums.len(), 1);
        assert_eq!(albums[0].hashes, vec!["h1", "h2"]);
        assert_eq!(albums[0].description, "trip");
        assert_eq!(albums[0].tags, vec!["summer"]);
    }

    #[tokio::test]
    async fn test_album_not_found_conditions() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir).await;

        assert!(store.update_album(album("ghost", &["h1"])).await.unwrap_err().is_not_found());
        assert!(store.delete_album("ghost").await.unwrap_err().is_not_found());
        assert!(
            store
                .delete_photos_from_album("ghost", &["h1".to_string()])
                .await
                .unwrap_err()
                .is_not_found()
        );
        assert!(store.get_album("ghost").await.unwrap_err().is_not_found());
        assert_eq!(store.album_count().await, 0);
    }

    #[tokio::test]
    async fn test_update_and_remove_photos_from_album() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir).await;
        store
            .insert_new_data(&[scanned("h1", "/p/a.jpg", &[])], "m1")
            .await
            .unwrap();
        store.insert_new_album(album("X", &["h1", "h2"])).await.unwrap();

        store.update_album(album("X", &["h3"])).await.unwrap();
        store
            .delete_photos_from_album("X", &["h1".to_string(), "h2".to_string()])
            .await
            .unwrap();

        let x = store.get_album("X").await.unwrap();
        assert_eq!(x.hashes, vec!["h3"]);
        // the photo record itself is untouched
        assert_eq!(store.photo_count().await, 1);

        store.delete_album("X").await.unwrap();
        assert!(store.list_albums().await.is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_album_merges_keep_every_hash() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir).await;

        let mut handles = Vec::new();
        for i in 0..20 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store.insert_new_album(album("shared", &[&format!("h{}", i)])).await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let shared = store.get_album("shared").await.unwrap();
        assert_eq!(store.album_count().await, 1);
        assert_eq!(shared.hashes.len(), 20);
    }

    #[tokio::test]
    async fn test_export_selection() {
        // ARRANGE
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir).await;
        store
            .insert_new_data(
                &[
                    with_thumbnail(scanned("h1", "/p/a.jpg", &[]), 10_000),
                    with_thumbnail(scanned("h2", "/p/b.jpg", &[]), 20_000),
                    with_thumbnail(scanned("h3", "/p/c.jpg", &[]), 30_000),
                ],
                "m1",
            )
            .await
            .unwrap();
        store.insert_new_album(album("X", &["h1", "h2", "h3"])).await.unwrap();

        // ACT
        let whole = store.export_selection("X", &[], SizeClass::Little).await.unwrap();
        let picked = store
            .export_selection(
                "X",
                &["h3".to_string(), "outsider".to_string(), "h1".to_string()],
                SizeClass::Little,
            )
            .await
            .unwrap();
        let medium = store.export_selection("X", &[], SizeClass::Medium).await.unwrap();

        // ASSERT
        assert_eq!(hashes(&whole), vec!["h1", "h2", "h3"]);
        assert_eq!(hashes(&picked), vec!["h3", "h1"]);
        assert_eq!(hashes(&medium), vec!["h2", "h3"]);
        assert!(store.export_selection("nope", &[], SizeClass::Little).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_export_limit() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir).await;
        let many: Vec<String> = (0..=EXPORT_LIMIT).map(|i| format!("h{}", i)).collect();
        store
            .insert_new_album(AlbumRecord {
                name: "big".to_string(),
                hashes: many,
                ..Default::default()
            })
            .await
            .unwrap();

        let err = store.export_selection("big", &[], SizeClass::Little).await.unwrap_err();

        assert!(matches!(
            err,
            CoreError::ExportTooLarge { selected, limit } if selected == EXPORT_LIMIT + 1 && limit == EXPORT_LIMIT
        ));
    }

    // ============================================================
    // TEST 6: Persistence
    // ============================================================

    #[tokio::test]
    async fn test_collections_survive_reopen() {
        let dir = TempDir::new().unwrap();
        {
            let store = open_store(&dir).await;
            store
                .insert_new_data(&[scanned("h1", "/p/beach.jpg", &[])], "m1")
                .await
                .unwrap();
            store.insert_new_album(album("X", &["h1"])).await.unwrap();
        }

        let store = open_store(&dir).await;

        assert_eq!(store.photo_count().await, 1);
        assert_eq!(hashes(&store.query_by_filename("beach").await), vec!["h1"]);
        assert_eq!(store.get_album("X").await.unwrap().hashes, vec!["h1"]);
        // reinserting after reload is still a no-op
        let again = store
            .insert_new_data(&[scanned("h1", "/p/beach.jpg", &[])], "m1")
            .await
            .unwrap();
        assert_eq!(again, 0);
    }

    #[tokio::test]
    async fn test_undecodable_lines_are_skipped() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("db");
        std::fs::create_dir_all(&root).unwrap();
        std::fs::write(
            root.join(PHOTOS_FILE),
            concat!(
                r#"{"md5sum":"h1","type":".jpg","filename":"a.jpg","filepath":"/p/a.jpg","machineid":"m1","exiftags":{},"thumbnail":""}"#,
                "\n",
                "this is not json\n",
                r#"{"filename":"no-hash.jpg","filepath":"/p/no-hash.jpg"}"#,
                "\n",
            ),
        )
        .unwrap();

        let store = DocumentStore::open(&root).await.unwrap();

        assert_eq!(hashes(&store.query_all().await), vec!["h1"]);
    }

    // ============================================================
    // TEST 7: Cleanup
    // ============================================================

    #[tokio::test]
    async fn test_cleanup_removes_orphans() {
        // ARRANGE
        let dir = TempDir::new().unwrap();
        let registry = NodeRegistry::load(dir.path().join("slaves.json")).await.unwrap();
        registry
            .register(WorkerNode::new("alive", "http://127.0.0.1", 4000, "/scan"))
            .await
            .unwrap();
        registry
            .register(WorkerNode::new("gone", "http://127.0.0.1", 4001, "/scan"))
            .await
            .unwrap();
        registry.set_active(&NodeId::from("gone"), false).await.unwrap();

        let store = open_store(&dir).await;
        store.insert_new_data(&[scanned("h1", "/p/a.jpg", &[])], "alive").await.unwrap();
        store.insert_new_data(&[scanned("h2", "/p/b.jpg", &[])], "gone").await.unwrap();
        store.insert_new_data(&[scanned("h3", "/p/c.jpg", &[])], "").await.unwrap();
        store.insert_new_data(&[scanned("h4", "/p/d.jpg", &[])], "google").await.unwrap();

        // ACT
        let report = store.clean_database(&registry).await.unwrap();

        // ASSERT
        assert_eq!(report.orphan_photos, 2);
        assert_eq!(hashes(&store.query_all().await), vec!["h1", "h4"]);
    }

    #[tokio::test]
    async fn test_cleanup_removes_legacy_duplicates() {
        // ARRANGE: collections written by an older version with duplicates
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("db");
        std::fs::create_dir_all(&root).unwrap();
        let photo = |hash: &str, path: &str| {
            format!(
                r#"{{"md5sum":"{}","type":".jpg","filename":"x.jpg","filepath":"{}","machineid":"m1"}}"#,
                hash, path
            )
        };
        std::fs::write(
            root.join(PHOTOS_FILE),
            [photo("h1", "/first"), photo("h2", "/p"), photo("h1", "/second")].join("\n"),
        )
        .unwrap();
        std::fs::write(
            root.join(ALBUMS_FILE),
            [
                r#"{"album_name":"X","md5sums":["h1"]}"#,
                r#"{"album_name":"Y","md5sums":[]}"#,
                r#"{"album_name":"X","md5sums":["h2"]}"#,
            ]
            .join("\n"),
        )
        .unwrap();
        let registry = NodeRegistry::load(dir.path().join("slaves.json")).await.unwrap();
        let store = DocumentStore::open(&root).await.unwrap();
        assert_eq!(store.photo_count().await, 3);

        // ACT
        let report = store.clean_database(&registry).await.unwrap();

        // ASSERT
        assert_eq!(report.duplicate_photos, 1);
        assert_eq!(report.duplicate_albums, 1);
        assert_eq!(report.orphan_photos, 0);

        let reopened = DocumentStore::open(&root).await.unwrap();
        let all = reopened.query_all().await;
        assert_eq!(hashes(&all), vec!["h1", "h2"]);
        assert_eq!(all[0].filepath, "/first");
        assert_eq!(reopened.get_album("X").await.unwrap().hashes, vec!["h1"]);
        assert_eq!(reopened.album_count().await, 2);
    }

    // ============================================================
    // TEST 8: Failed writes
    // ============================================================

    // Turns a collection file into a non-empty directory so the next rename
    // onto it fails.
    fn block_file(root: &std::path::Path, file: &str) {
        let path = root.join(file);
        let _ = std::fs::remove_file(&path);
        std::fs::create_dir_all(path.join("blocker")).unwrap();
    }

    fn unblock_file(root: &std::path::Path, file: &str) {
        std::fs::remove_dir_all(root.join(file)).unwrap();
    }

    #[tokio::test]
    async fn test_failed_photo_write_is_not_applied() {
        // ARRANGE
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("db");
        let store = DocumentStore::open(&root).await.unwrap();
        block_file(&root, PHOTOS_FILE);

        // ACT
        let first = store.insert_new_data(&[scanned("h1", "/p/a.jpg", &[])], "m1").await;

        // ASSERT: nothing visible, and a retry after recovery stores the photo
        assert!(first.is_err());
        assert_eq!(store.photo_count().await, 0);
        assert!(store.query_by_filename("a").await.is_empty());

        unblock_file(&root, PHOTOS_FILE);
        let retry = store
            .insert_new_data(&[scanned("h1", "/p/a.jpg", &[])], "m1")
            .await
            .unwrap();
        assert_eq!(retry, 1);

        let reopened = DocumentStore::open(&root).await.unwrap();
        assert_eq!(hashes(&reopened.query_all().await), vec!["h1"]);
    }

    #[tokio::test]
    async fn test_failed_album_write_is_not_applied() {
        // ARRANGE
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("db");
        let store = DocumentStore::open(&root).await.unwrap();
        store.insert_new_album(album("kept", &["h1"])).await.unwrap();
        block_file(&root, ALBUMS_FILE);

        // ACT
        let created = store.insert_new_album(album("X", &["h1"])).await;
        let merged = store.insert_new_album(album("kept", &["h2"])).await;
        let deleted = store.delete_album("kept").await;
        let trimmed = store.delete_photos_from_album("kept", &["h1".to_string()]).await;

        // ASSERT
        assert!(created.is_err());
        assert!(merged.is_err());
        assert!(deleted.is_err());
        assert!(trimmed.is_err());
        assert!(store.get_album("X").await.unwrap_err().is_not_found());
        assert_eq!(store.get_album("kept").await.unwrap().hashes, vec!["h1"]);
        assert_eq!(store.album_count().await, 1);
    }

    #[tokio::test]
    async fn test_failed_cleanup_write_keeps_records() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("db");
        let registry = NodeRegistry::load(dir.path().join("slaves.json")).await.unwrap();
        let store = DocumentStore::open(&root).await.unwrap();
        store.insert_new_data(&[scanned("h1", "/p/a.jpg", &[])], "").await.unwrap();
        block_file(&root, PHOTOS_FILE);

        let result = store.clean_database(&registry).await;

        assert!(result.is_err());
        assert_eq!(store.photo_count().await, 1);
    }

    #[test]
    fn test_temp_names_keep_the_full_file_name() {
        let dir = std::path::Path::new("/data/db");

        let photos = temp_path_for(&dir.join("photos_collection.jsonl"));
        let registry = temp_path_for(&dir.join("photos_collection.json"));

        assert_eq!(photos, dir.join("photos_collection.jsonl.tmp"));
        assert_eq!(registry, dir.join("photos_collection.json.tmp"));
        assert_ne!(photos, registry);
    }
}
