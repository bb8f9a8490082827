use super::tags::{DATE_TIME, DATE_TIME_ORIGINAL, ExifTags, TIMESTAMP_MILLIS};

use chrono::{DateTime, Datelike, NaiveDateTime};
use serde::{Deserialize, Serialize};

const EXIF_DATE_FORMAT: &str = "%Y:%m:%d %H:%M:%S";

/// Granularity of a time bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupBy {
    Month,
    Year,
}

impl GroupBy {
    /// `"month"` or `"year"`; anything else is not a grouping.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "month" => Some(GroupBy::Month),
            "year" => Some(GroupBy::Year),
            _ => None,
        }
    }
}

/// Capture time of a photo, if any known tag carries one.
///
/// The epoch-millisecond tag wins over the textual EXIF dates. Timestamps are
/// interpreted as UTC.
pub fn date_from_exif(tags: &ExifTags) -> Option<NaiveDateTime> {
    if let Some(raw) = tags.get(TIMESTAMP_MILLIS)
        && let Ok(millis) = raw.trim().parse::<i64>()
        && let Some(at) = DateTime::from_timestamp_millis(millis)
    {
        return Some(at.naive_utc());
    }

    [DATE_TIME_ORIGINAL, DATE_TIME]
        .iter()
        .filter_map(|key| tags.get(key))
        .find_map(|raw| NaiveDateTime::parse_from_str(raw.trim(), EXIF_DATE_FORMAT).ok())
}

/// Bucket key for the photo's capture time, formatted `YYYY-MM-DD`.
///
/// Month buckets are the first day of the month, year buckets January 1st.
/// Year keys are `YYYY-01-01`, not the day-zero normalization `(YYYY-1)-11-30`
/// that older exports of the collection carry.
/// Returns `""` when the photo has no parseable date or `groupby` is unknown;
/// callers drop empty buckets.
pub fn date_bucket(tags: &ExifTags, groupby: &str) -> String {
    let Some(groupby) = GroupBy::parse(groupby) else {
        return String::new();
    };
    let Some(at) = date_from_exif(tags) else {
        return String::new();
    };

    match groupby {
        GroupBy::Month => format!("{:04}-{:02}-01", at.year(), at.month()),
        GroupBy::Year => format!("{:04}-01-01", at.year()),
    }
}
