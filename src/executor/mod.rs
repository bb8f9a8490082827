//! Scan Execution Module
//!
//! Turns "scan these directories on that machine" into photo records in the
//! document store.
//!
//! ## Architecture Overview
//! The dispatcher follows a **fan-out / fan-in** model:
//! 1. **Resolution**: the target node is looked up in the registry. An unknown node
//!    makes the whole dispatch a logged no-op.
//! 2. **Fan-out**: one job per directory goes into a bounded queue drained by a fixed
//!    pool of workers. Each worker calls the node's scan endpoint.
//! 3. **Fan-in**: decoded batches flow through an unbounded channel into a single
//!    consumer that persists them with `DocumentStore::insert_new_data`.
//! 4. **Isolation**: a directory whose call fails contributes an empty batch; its
//!    siblings are unaffected and nothing is retried.
//!
//! ## Submodules
//! - **`dispatcher`**: the pool, the consumer and their shutdown sequencing.
//! - **`client`**: HTTP client for the worker scan endpoint.
//! - **`protocol`**: worker answer and scan request DTOs.
//! - **`types`**: jobs, batches and the dispatch report.
//! - **`handlers`**: `POST /scan`.

pub mod client;
pub mod dispatcher;
pub mod handlers;
pub mod protocol;
pub mod types;
