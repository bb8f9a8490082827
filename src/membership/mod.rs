//! Worker Membership Module
//!
//! Keeps track of the machines that can scan their disks for photos. Workers
//! announce themselves over HTTP; the master keeps them in a registry that
//! survives restarts through a snapshot file.
//!
//! ## Core Concepts
//! - **Registry**: `NodeRegistry` maps worker identity to `WorkerNode`. Re-registration
//!   overwrites. Every mutation rewrites the snapshot under a single writer lock.
//! - **Liveness**: `LivenessMonitor` probes workers on an interval and flips their
//!   `active` flag. The flag is advisory; inactive workers are never removed
//!   automatically, but their photos are dropped by database cleanup.
//! - **Self registration**: `RegistrationAgent` runs on the worker side and
//!   re-announces the worker to the master every cycle.
//!
//! ## Submodules
//! - `types`: `NodeId`, `WorkerNode`, snapshot layout.
//! - `service`: the registry.
//! - `liveness`, `agent`: background loops.
//! - `handlers`: `/register` and `/registeredslaves`.

pub mod agent;
pub mod handlers;
pub mod liveness;
pub mod service;
pub mod types;
