use super::reduce::SizeClass;
use crate::context::CoreContext;
use crate::storage::types::PhotoRecord;

use axum::extract::Query;
use axum::{Extension, Json};
use serde::Deserialize;
use std::sync::Arc;

pub const ENDPOINT_QUERY_ALL: &str = "/queryall";
pub const ENDPOINT_QUERY_FILENAME: &str = "/queryfilename";
pub const ENDPOINT_QUERY_EXTENSION: &str = "/queryextension";
pub const ENDPOINT_QUERY_EXIF: &str = "/queryexif";

/// `value` is the search pattern, `exif` the tag name for EXIF searches,
/// `filesize` the size class applied to the results.
#[derive(Debug, Default, Deserialize)]
pub struct QueryParams {
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub exif: String,
    #[serde(default)]
    pub filesize: Option<String>,
}

impl QueryParams {
    fn size(&self) -> SizeClass {
        self.filesize
            .as_deref()
            .map(SizeClass::parse)
            .unwrap_or_default()
    }
}

pub async fn handle_query_all(
    Extension(ctx): Extension<Arc<CoreContext>>,
    Query(params): Query<QueryParams>,
) -> Json<Vec<PhotoRecord>> {
    Json(ctx.query_all(params.size()).await)
}

pub async fn handle_query_filename(
    Extension(ctx): Extension<Arc<CoreContext>>,
    Query(params): Query<QueryParams>,
) -> Json<Vec<PhotoRecord>> {
    tracing::debug!("Filename query {:?}", params.value);
    Json(ctx.query_by_filename(&params.value, params.size()).await)
}

pub async fn handle_query_extension(
    Extension(ctx): Extension<Arc<CoreContext>>,
    Query(params): Query<QueryParams>,
) -> Json<Vec<PhotoRecord>> {
    tracing::debug!("Extension query {:?}", params.value);
    Json(ctx.query_by_extension(&params.value, params.size()).await)
}

pub async fn handle_query_exif(
    Extension(ctx): Extension<Arc<CoreContext>>,
    Query(params): Query<QueryParams>,
) -> Json<Vec<PhotoRecord>> {
    tracing::debug!("EXIF query {:?} in tag {:?}", params.value, params.exif);
    Json(
        ctx.query_by_exif_tag(&params.value, &params.exif, params.size())
            .await,
    )
}
