use super::protocol::{SCAN_ACCEPTED, ScanRequest};
use crate::context::CoreContext;
use crate::membership::types::NodeId;

use axum::{Extension, Json, http::StatusCode};
use std::sync::Arc;

/// Launches the scan and answers before any directory is scanned.
pub async fn handle_scan(
    Extension(ctx): Extension<Arc<CoreContext>>,
    Json(req): Json<ScanRequest>,
) -> (StatusCode, Json<&'static str>) {
    let node_id = NodeId(req.machine_id);
    tracing::info!("Scan of {} folder(s) requested on {}", req.folders.len(), node_id);

    drop(ctx.dispatch(req.folders, &node_id));
    (StatusCode::OK, Json(SCAN_ACCEPTED))
}
