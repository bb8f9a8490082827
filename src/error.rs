//! Error taxonomy shared by the registry, the dispatcher and the document store.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors surfaced to callers of the core.
///
/// Duplicate inserts (same content hash, same album name) are not errors:
/// they are absorbed as idempotent inserts or merge-updates.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Missing or invalid configuration (e.g. empty database path).
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error while reading or writing persisted state.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Encoding or decoding of persisted state failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The named album (or other keyed entry) does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// An export selection exceeded the per-export photo limit.
    #[error("Too many photos selected for export: {selected} (limit {limit})")]
    ExportTooLarge { selected: usize, limit: usize },
}

impl CoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, CoreError::NotFound(_))
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            CoreError::NotFound(_) => StatusCode::NOT_FOUND,
            CoreError::ExportTooLarge { .. } => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// JSON body of every failed API call.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl IntoResponse for CoreError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        }
        (status, Json(ErrorBody { error: self.to_string() })).into_response()
    }
}
