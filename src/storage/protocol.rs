//! API DTOs for album, aggregate and maintenance endpoints.

use super::types::AlbumRecord;
use serde::{Deserialize, Serialize};

pub const ENDPOINT_ALBUM_CREATE: &str = "/album/create";
pub const ENDPOINT_ALBUM_UPDATE: &str = "/album/update";
pub const ENDPOINT_ALBUM_DELETE: &str = "/album/delete";
pub const ENDPOINT_ALBUM_DELETE_PHOTOS: &str = "/album/deletephotos";
pub const ENDPOINT_ALBUM_LIST: &str = "/album/list";
pub const ENDPOINT_ALBUM_DATA: &str = "/album/data";
pub const ENDPOINT_ALBUM_EXPORT: &str = "/album/export";
pub const ENDPOINT_STATS_ORIGIN: &str = "/stats/origin";
pub const ENDPOINT_STATS_LOCATION: &str = "/stats/location";
pub const ENDPOINT_STATS_TIME: &str = "/stats/time";
pub const ENDPOINT_PHOTOS_LOCATION: &str = "/photos/location";
pub const ENDPOINT_PHOTOS_TIME: &str = "/photos/time";
pub const ENDPOINT_CLEAN: &str = "/clean";

/// Body of album create/update calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlbumMessage {
    pub album_name: String,
    #[serde(default)]
    pub md5sums: Vec<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl From<AlbumMessage> for AlbumRecord {
    fn from(message: AlbumMessage) -> Self {
        AlbumRecord {
            name: message.album_name,
            description: message.description,
            tags: message.tags,
            hashes: message.md5sums,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteAlbumRequest {
    pub album_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeletePhotosRequest {
    pub album_name: String,
    pub md5sums: Vec<String>,
}

/// `?value=<album>` lookups.
#[derive(Debug, Clone, Deserialize)]
pub struct AlbumParams {
    pub value: String,
}

/// `?value=<album>&md5sums=h1,h2&filesize=medium`. An absent or empty
/// `md5sums` exports the whole album.
#[derive(Debug, Clone, Deserialize)]
pub struct ExportParams {
    pub value: String,
    #[serde(default)]
    pub md5sums: Option<String>,
    #[serde(default)]
    pub filesize: Option<String>,
}

impl ExportParams {
    pub fn selection(&self) -> Vec<String> {
        self.md5sums
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|hash| !hash.is_empty())
            .map(str::to_string)
            .collect()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GroupByParams {
    #[serde(default)]
    pub groupby: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LocationParams {
    pub lat: f64,
    pub lng: f64,
    #[serde(default)]
    pub filesize: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TimeParams {
    pub date: String,
    #[serde(default)]
    pub groupby: String,
    #[serde(default)]
    pub filesize: Option<String>,
}
