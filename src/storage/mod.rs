//! Document Storage Module
//!
//! Content-addressed store for photo and album records.
//!
//! ## Core Concepts
//! - **Identity**: a photo is its MD5 content hash. Inserting a known hash is a no-op;
//!   inserting a known album name merges into the existing album.
//! - **Indexes**: hash, file type, origin, filename tokens and path tokens are indexed;
//!   EXIF searches scan, since tag sets are open-ended.
//! - **Queries**: `Predicate` values describe a query; the index layer picks the index.
//! - **Persistence**: one JSON-lines file per collection, rewritten atomically under
//!   the collection's write lock. Indexes are rebuilt on open.
//! - **Maintenance**: cleanup drops photos of vanished or inactive workers, duplicate
//!   photos and duplicate albums, then compacts.
//!
//! ## Submodules
//! - `types`: records, aggregate buckets, cleanup report.
//! - `store`: `DocumentStore`.
//! - `index`, `query`: secondary indexes and predicates.
//! - `persist`: JSON-lines files and atomic writes.
//! - `protocol`, `handlers`: album, aggregate and maintenance endpoints.

pub mod handlers;
pub mod index;
pub mod persist;
pub mod protocol;
pub mod query;
pub mod store;
pub mod types;

#[cfg(test)]
mod tests;
