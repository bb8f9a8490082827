use crate::storage::types::PhotoRecord;

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Thumbnail size class requested by a caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeClass {
    #[default]
    Little,
    Medium,
    Big,
}

impl SizeClass {
    /// Unknown names fall back to `Little`, which filters nothing.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "medium" => SizeClass::Medium,
            "big" => SizeClass::Big,
            _ => SizeClass::Little,
        }
    }

    /// Exclusive lower bound on the thumbnail payload length.
    pub fn min_payload(&self) -> Option<usize> {
        match self {
            SizeClass::Little => None,
            SizeClass::Medium => Some(15_000),
            SizeClass::Big => Some(25_000),
        }
    }

    pub fn admits(&self, payload_len: usize) -> bool {
        self.min_payload().is_none_or(|min| payload_len > min)
    }
}

/// Drops repeated content hashes (first occurrence wins, order kept), then
/// drops records whose thumbnail is too small for `size`.
pub fn reduce(records: Vec<PhotoRecord>, size: SizeClass) -> Vec<PhotoRecord> {
    let mut seen = HashSet::new();
    records
        .into_iter()
        .filter(|record| seen.insert(record.md5sum.clone()))
        .filter(|record| size.admits(record.thumbnail.len()))
        .collect()
}
