//! Scan Protocol Definitions
//!
//! DTOs exchanged with worker nodes (the scan endpoint response) and with API
//! callers (the scan request). Workers answer
//! `GET <scan path>?value=<directory>` with a `PhotoResponse`.

use crate::exif::ExifTags;
use serde::{Deserialize, Serialize};

pub const ENDPOINT_SCAN: &str = "/scan";
pub const SCAN_QUERY_PARAM: &str = "value";
pub const SCAN_ACCEPTED: &str = "Scans launched.";

/// One photo as reported by a worker. `md5sum` is computed by the worker
/// over the file bytes.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ScannedPhoto {
    pub filename: String,
    pub filepath: String,
    pub md5sum: String,
    #[serde(default)]
    pub tags: ExifTags,
    #[serde(default)]
    pub thumbnail: String,
}

/// Body of a worker's scan answer for one directory.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PhotoResponse {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub machine: String,
    #[serde(default)]
    pub photos: Vec<ScannedPhoto>,
}

/// `POST /scan` body: directories to scan on one worker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanRequest {
    #[serde(rename = "machineid")]
    pub machine_id: String,
    pub folders: Vec<String>,
}
