use crate::executor::protocol::ScannedPhoto;
use crate::exif::{Coordinates, ExifTags, coordinates_from_exif, date_bucket};
use crate::search::tokenizer::file_type;

use serde::{Deserialize, Serialize};

/// Position of a record inside its collection. Ids follow insertion order
/// and are reassigned on compaction.
pub type DocId = u64;

/// A photo known to the index.
///
/// `md5sum` is the identity: two records with the same hash are the same photo
/// whatever their path or origin.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PhotoRecord {
    pub md5sum: String,
    #[serde(rename = "type", default)]
    pub file_type: String,
    pub filename: String,
    pub filepath: String,
    /// Worker identity (or cloud origin) that produced the record.
    #[serde(rename = "machineid", default)]
    pub origin: String,
    #[serde(rename = "exiftags", default)]
    pub exif: ExifTags,
    /// Inline encoded thumbnail.
    #[serde(default)]
    pub thumbnail: String,
}

impl PhotoRecord {
    pub fn from_scanned(photo: &ScannedPhoto, origin: &str) -> Self {
        Self {
            md5sum: photo.md5sum.clone(),
            file_type: file_type(&photo.filename),
            filename: photo.filename.clone(),
            filepath: photo.filepath.clone(),
            origin: origin.to_string(),
            exif: photo.tags.clone(),
            thumbnail: photo.thumbnail.clone(),
        }
    }

    pub fn coordinates(&self) -> Coordinates {
        coordinates_from_exif(&self.exif)
    }

    pub fn date_bucket(&self, groupby: &str) -> String {
        date_bucket(&self.exif, groupby)
    }
}

/// A named, ordered selection of photo hashes.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AlbumRecord {
    #[serde(rename = "album_name")]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(rename = "md5sums", default)]
    pub hashes: Vec<String>,
}

impl AlbumRecord {
    /// Appends hashes not already present, keeping the existing order.
    pub fn merge_hashes<I: IntoIterator<Item = String>>(&mut self, hashes: I) {
        for hash in hashes {
            if !self.hashes.contains(&hash) {
                self.hashes.push(hash);
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LocationBucket {
    pub latitude: f64,
    pub longitude: f64,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimeBucket {
    pub date: String,
    pub count: usize,
}

/// What a cleanup pass removed.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CleanReport {
    pub orphan_photos: usize,
    pub duplicate_photos: usize,
    pub duplicate_albums: usize,
}

impl CleanReport {
    pub fn total(&self) -> usize {
        self.orphan_photos + self.duplicate_photos + self.duplicate_albums
    }
}
