//! Photo Cluster Library
//!
//! Aggregates photo metadata scanned on several machines into one searchable
//! index. The binary (`main.rs`) only parses configuration, builds the
//! `CoreContext` and serves the router defined here.
//!
//! ## Architecture Modules
//! - **`exif`**: Normalization of heterogeneous EXIF tag bags into rounded
//!   coordinates and date buckets. Pure functions.
//! - **`membership`**: Registry of worker nodes, persisted as a snapshot file,
//!   plus the liveness monitor and the worker-side registration agent.
//! - **`executor`**: The scan dispatcher. A bounded pool of workers calls a node's
//!   scan endpoint per directory and feeds a single aggregation consumer.
//! - **`storage`**: Content-addressed document store for photos and albums, with
//!   secondary indexes, typed queries and JSON-lines persistence.
//! - **`search`**: Filename tokenizer, result reduction (dedup + size class) and the
//!   query endpoints.
//! - **`context`**: Construct-once wiring of the above, and the API surface.

pub mod activity;
pub mod config;
pub mod context;
pub mod error;
pub mod executor;
pub mod exif;
pub mod membership;
pub mod router;
pub mod search;
pub mod storage;
