use super::service::NodeRegistry;
use super::types::WorkerNode;
use crate::error::CoreError;

use axum::{Extension, Json, http::StatusCode};
use std::sync::Arc;

/// Worker registration. Answers the JSON string `"ok"` that registration
/// agents check for.
pub async fn handle_register(
    Extension(registry): Extension<Arc<NodeRegistry>>,
    Json(node): Json<WorkerNode>,
) -> Result<(StatusCode, Json<&'static str>), CoreError> {
    registry.register(node).await?;
    Ok((StatusCode::OK, Json("ok")))
}

pub async fn handle_list_nodes(
    Extension(registry): Extension<Arc<NodeRegistry>>,
) -> (StatusCode, Json<Vec<WorkerNode>>) {
    (StatusCode::OK, Json(registry.list()))
}
