use super::tags::*;

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Decimal places kept for every coordinate that leaves this module.
pub const COORDINATE_PLACES: i32 = 2;
/// Fractional threshold at which a digit is rounded up.
pub const ROUND_ON: f64 = 0.5;

static DMS_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\s*([+-]?\d+(?:\.\d+)?)\s*deg\s*(\d+(?:\.\d+)?)'\s*(\d+(?:\.\d+)?)"#)
        .expect("DMS pattern is a valid regex")
});

/// A normalized `(latitude, longitude)` pair in decimal degrees.
///
/// `(0, 0)` is the "no position" sentinel: photos carrying it are excluded
/// from every location grouping, even though it is a valid point on Earth.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub const ABSENT: Coordinates = Coordinates {
        latitude: 0.0,
        longitude: 0.0,
    };

    /// Builds a pair rounded with the same precision as normalized EXIF values,
    /// so query coordinates compare equal to stored ones.
    pub fn rounded(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude: round(latitude, ROUND_ON, COORDINATE_PLACES),
            longitude: round(longitude, ROUND_ON, COORDINATE_PLACES),
        }
    }

    pub fn is_absent(&self) -> bool {
        self.latitude == 0.0 && self.longitude == 0.0
    }
}

/// Rounds `value` to `places` decimals: the scaled fractional part is compared
/// to `round_on` and the digit is ceiled or floored accordingly.
///
/// The rule is applied to the magnitude and the sign restored afterwards, so
/// `-2.2424` and `2.2424` round to opposite values of the same bucket.
pub fn round(value: f64, round_on: f64, places: i32) -> f64 {
    let pow = 10f64.powi(places);
    let digit = pow * value.abs();
    let rounded = if digit.fract() >= round_on {
        digit.ceil()
    } else {
        digit.floor()
    };

    if rounded == 0.0 {
        return 0.0;
    }
    (rounded / pow).copysign(value)
}

/// Normalizes a tag bag into rounded coordinates.
///
/// Tag sets are tried in priority order: decimal degrees, DMS strings,
/// comma triads. Returns `Coordinates::ABSENT` when none is present.
pub fn coordinates_from_exif(tags: &ExifTags) -> Coordinates {
    if let Some((lat, lng)) = tags.pair(LATITUDE_DECIMAL, LONGITUDE_DECIMAL) {
        let latitude = round(parse_decimal(lat), ROUND_ON, COORDINATE_PLACES);
        let longitude = round(parse_decimal(lng), ROUND_ON, COORDINATE_PLACES);
        return Coordinates::rounded(latitude, longitude);
    }

    if let Some((lat, lng)) = tags.pair(LATITUDE_DMS, LONGITUDE_DMS) {
        let mut latitude = parse_dms(lat).unwrap_or_else(|| {
            tracing::error!("Failed to parse DMS latitude {:?}", lat);
            0.0
        });
        let mut longitude = parse_dms(lng).unwrap_or_else(|| {
            tracing::error!("Failed to parse DMS longitude {:?}", lng);
            0.0
        });
        if ref_matches(tags.get(LATITUDE_DMS_REF), "South") {
            latitude = -latitude;
        }
        if ref_matches(tags.get(LONGITUDE_DMS_REF), "West") {
            longitude = -longitude;
        }
        return Coordinates::rounded(latitude, longitude);
    }

    if let Some((lat, lng)) = tags.pair(LATITUDE_TRIAD, LONGITUDE_TRIAD) {
        let mut latitude = parse_triad(lat).unwrap_or_else(|| {
            tracing::error!("Failed to parse latitude triad {:?}", lat);
            0.0
        });
        let mut longitude = parse_triad(lng).unwrap_or_else(|| {
            tracing::error!("Failed to parse longitude triad {:?}", lng);
            0.0
        });
        if ref_matches(tags.get(LATITUDE_TRIAD_REF), "S") {
            latitude = -latitude;
        }
        if ref_matches(tags.get(LONGITUDE_TRIAD_REF), "W") {
            longitude = -longitude;
        }
        return Coordinates::rounded(latitude, longitude);
    }

    Coordinates::ABSENT
}

// Unparseable decimal components count as zero.
fn parse_decimal(raw: &str) -> f64 {
    raw.trim().parse::<f64>().unwrap_or(0.0)
}

/// Parses `D deg M' S"`, rounded. A leading minus on the degrees negates the
/// whole value.
pub fn parse_dms(raw: &str) -> Option<f64> {
    let caps = DMS_PATTERN.captures(raw)?;
    let degrees = caps.get(1)?.as_str();
    let minutes: f64 = caps.get(2)?.as_str().parse().ok()?;
    let seconds: f64 = caps.get(3)?.as_str().parse().ok()?;
    combine(degrees, minutes, seconds)
}

/// Parses a `D, M, S` triad, rounded.
pub fn parse_triad(raw: &str) -> Option<f64> {
    let parts: Vec<&str> = raw.split(',').map(str::trim).collect();
    if parts.len() != 3 {
        return None;
    }
    let minutes: f64 = parts[1].parse().ok()?;
    let seconds: f64 = parts[2].parse().ok()?;
    combine(parts[0], minutes, seconds)
}

fn combine(degrees: &str, minutes: f64, seconds: f64) -> Option<f64> {
    let negative = degrees.starts_with('-');
    let degrees: f64 = degrees.trim_start_matches(['+', '-']).parse().ok()?;
    let magnitude = round(
        degrees + minutes / 60.0 + seconds / 3600.0,
        ROUND_ON,
        COORDINATE_PLACES,
    );
    Some(if negative { -magnitude } else { magnitude })
}

fn ref_matches(value: Option<&str>, expected: &str) -> bool {
    value
        .map(|v| v.trim().eq_ignore_ascii_case(expected))
        .unwrap_or(false)
}
