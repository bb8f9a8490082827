use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// Decimal degrees (cloud photo export).
pub const LATITUDE_DECIMAL: &str = "latitude";
pub const LONGITUDE_DECIMAL: &str = "longitude";

// Degrees/minutes/seconds strings (`2 deg 14' 32.77"`).
pub const LATITUDE_DMS: &str = "GPS Latitude";
pub const LONGITUDE_DMS: &str = "GPS Longitude";
pub const LATITUDE_DMS_REF: &str = "GPS Latitude Ref";
pub const LONGITUDE_DMS_REF: &str = "GPS Longitude Ref";

// Comma separated triads (`38, 54, 35.40`), as read from local files.
pub const LATITUDE_TRIAD: &str = "Latitude";
pub const LONGITUDE_TRIAD: &str = "Longitude";
pub const LATITUDE_TRIAD_REF: &str = "North or South Latitude";
pub const LONGITUDE_TRIAD_REF: &str = "East or West Longitude";

pub const TIMESTAMP_MILLIS: &str = "timestamp";
pub const DATE_TIME_ORIGINAL: &str = "Date and Time (Original)";
pub const DATE_TIME: &str = "Date and Time";

/// Open EXIF tag bag attached to every photo.
///
/// Keys are kept exactly as the producer sent them; only the helpers below
/// interpret them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExifTags(BTreeMap<String, String>);

impl ExifTags {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Both members of a tag pair, only when both are present.
    pub fn pair(&self, first: &str, second: &str) -> Option<(&str, &str)> {
        Some((self.get(first)?, self.get(second)?))
    }
}

impl<K, V> FromIterator<(K, V)> for ExifTags
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
