use super::protocol::*;
use super::types::{AlbumRecord, LocationBucket, PhotoRecord, TimeBucket};
use crate::context::CoreContext;
use crate::error::CoreError;
use crate::search::reduce::SizeClass;

use axum::extract::Query;
use axum::http::StatusCode;
use axum::{Extension, Json};
use std::collections::BTreeMap;
use std::sync::Arc;

fn size_of(filesize: &Option<String>) -> SizeClass {
    filesize.as_deref().map(SizeClass::parse).unwrap_or_default()
}

// ============ Albums ============

pub async fn handle_create_album(
    Extension(ctx): Extension<Arc<CoreContext>>,
    Json(req): Json<AlbumMessage>,
) -> Result<Json<&'static str>, CoreError> {
    ctx.create_album(req.into()).await?;
    Ok(Json("ok"))
}

pub async fn handle_update_album(
    Extension(ctx): Extension<Arc<CoreContext>>,
    Json(req): Json<AlbumMessage>,
) -> Result<Json<&'static str>, CoreError> {
    ctx.update_album(req.into()).await?;
    Ok(Json("ok"))
}

pub async fn handle_delete_album(
    Extension(ctx): Extension<Arc<CoreContext>>,
    Json(req): Json<DeleteAlbumRequest>,
) -> Result<Json<&'static str>, CoreError> {
    ctx.delete_album(&req.album_name).await?;
    Ok(Json("ok"))
}

pub async fn handle_delete_album_photos(
    Extension(ctx): Extension<Arc<CoreContext>>,
    Json(req): Json<DeletePhotosRequest>,
) -> Result<Json<&'static str>, CoreError> {
    ctx.remove_photos_from_album(&req.album_name, &req.md5sums)
        .await?;
    Ok(Json("ok"))
}

pub async fn handle_list_albums(
    Extension(ctx): Extension<Arc<CoreContext>>,
) -> (StatusCode, Json<Vec<AlbumRecord>>) {
    (StatusCode::OK, Json(ctx.list_albums().await))
}

pub async fn handle_album_data(
    Extension(ctx): Extension<Arc<CoreContext>>,
    Query(params): Query<AlbumParams>,
) -> Result<Json<AlbumRecord>, CoreError> {
    Ok(Json(ctx.get_album(&params.value).await?))
}

pub async fn handle_export_album(
    Extension(ctx): Extension<Arc<CoreContext>>,
    Query(params): Query<ExportParams>,
) -> Result<Json<Vec<PhotoRecord>>, CoreError> {
    let photos = ctx
        .export_album(&params.value, &params.selection(), size_of(&params.filesize))
        .await?;
    Ok(Json(photos))
}

// ============ Aggregates ============

pub async fn handle_origin_stats(
    Extension(ctx): Extension<Arc<CoreContext>>,
) -> Json<BTreeMap<String, usize>> {
    Json(ctx.origin_stats().await)
}

pub async fn handle_location_stats(
    Extension(ctx): Extension<Arc<CoreContext>>,
) -> Json<Vec<LocationBucket>> {
    Json(ctx.location_stats().await)
}

pub async fn handle_time_stats(
    Extension(ctx): Extension<Arc<CoreContext>>,
    Query(params): Query<GroupByParams>,
) -> Json<Vec<TimeBucket>> {
    Json(ctx.time_stats(&params.groupby).await)
}

pub async fn handle_photos_by_location(
    Extension(ctx): Extension<Arc<CoreContext>>,
    Query(params): Query<LocationParams>,
) -> Json<Vec<PhotoRecord>> {
    Json(
        ctx.photos_near(params.lat, params.lng, size_of(&params.filesize))
            .await,
    )
}

pub async fn handle_photos_by_time(
    Extension(ctx): Extension<Arc<CoreContext>>,
    Query(params): Query<TimeParams>,
) -> Json<Vec<PhotoRecord>> {
    Json(
        ctx.photos_at(&params.date, &params.groupby, size_of(&params.filesize))
            .await,
    )
}

// ============ Maintenance ============

/// Starts a cleanup and answers immediately; progress shows up in `/history`.
pub async fn handle_clean(Extension(ctx): Extension<Arc<CoreContext>>) -> Json<&'static str> {
    drop(ctx.clean_database());
    Json("ok")
}
