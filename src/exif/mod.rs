//! EXIF Normalization Module
//!
//! Photos reach the index from several producers (local worker scans, cloud album
//! exports) and every producer names its EXIF tags differently. This module turns
//! those heterogeneous tag bags into the canonical values used for aggregation.
//!
//! ## Responsibilities
//! - **Tag bag**: `ExifTags` is an open key -> string container with lookup helpers
//!   for the tag names the normalizer understands. Unknown keys pass through untouched.
//! - **Coordinates**: three independent geo encodings (decimal degrees, `D deg M' S"`
//!   strings and `D, M, S` triads) collapse into one `(latitude, longitude)` pair
//!   rounded to 2 decimal places. `(0, 0)` means "no position".
//! - **Dates**: epoch-millisecond and `YYYY:MM:DD HH:MM:SS` timestamps collapse into
//!   a month or year bucket formatted `YYYY-MM-DD`.
//!
//! Location and time statistics bucket photos by equality of these values, so
//! every caller must go through this module rather than parse tags itself.

pub mod coordinates;
pub mod date;
pub mod tags;

pub use coordinates::{Coordinates, coordinates_from_exif, round};
pub use date::{GroupBy, date_bucket};
pub use tags::ExifTags;
