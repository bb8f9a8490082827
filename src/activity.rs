//! User-visible action history.
//!
//! Long running work (scans, cleanups) happens in the background; the history
//! is how an operator sees it progress. It is bounded and in-memory only.

use axum::{Extension, Json};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::Arc;

pub const HISTORY_CAPACITY: usize = 200;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActivityEntry {
    pub at: DateTime<Utc>,
    pub message: String,
}

pub struct ActivityLog {
    entries: Mutex<VecDeque<ActivityEntry>>,
    capacity: usize,
}

impl ActivityLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity: capacity.max(1),
        }
    }

    /// Appends a message, evicting the oldest entry when full.
    pub fn post(&self, message: impl Into<String>) {
        let message = message.into();
        tracing::info!("{}", message);

        let mut entries = self.entries.lock();
        if entries.len() == self.capacity {
            entries.pop_front();
        }
        entries.push_back(ActivityEntry {
            at: Utc::now(),
            message,
        });
    }

    /// Entries oldest first.
    pub fn recent(&self) -> Vec<ActivityEntry> {
        self.entries.lock().iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl Default for ActivityLog {
    fn default() -> Self {
        Self::new(HISTORY_CAPACITY)
    }
}

pub async fn handle_history(Extension(log): Extension<Arc<ActivityLog>>) -> Json<Vec<ActivityEntry>> {
    Json(log.recent())
}
