//! HTTP routes. Paths match what existing workers and front-ends call.

use crate::activity::handle_history;
use crate::context::CoreContext;
use crate::executor::handlers::handle_scan;
use crate::executor::protocol::ENDPOINT_SCAN;
use crate::membership::agent::{ENDPOINT_LIST_NODES, ENDPOINT_REGISTER};
use crate::membership::handlers::{handle_list_nodes, handle_register};
use crate::search::handlers::*;
use crate::storage::handlers::*;
use crate::storage::protocol::*;

use axum::{
    Router,
    extract::Extension,
    routing::{get, post},
};
use std::sync::Arc;

pub fn build_router(ctx: Arc<CoreContext>) -> Router {
    Router::new()
        .route(ENDPOINT_REGISTER, post(handle_register))
        .route(ENDPOINT_LIST_NODES, get(handle_list_nodes))
        .route(ENDPOINT_SCAN, post(handle_scan))
        .route(ENDPOINT_QUERY_ALL, get(handle_query_all))
        .route(ENDPOINT_QUERY_FILENAME, get(handle_query_filename))
        .route(ENDPOINT_QUERY_EXTENSION, get(handle_query_extension))
        .route(ENDPOINT_QUERY_EXIF, get(handle_query_exif))
        .route(ENDPOINT_ALBUM_CREATE, post(handle_create_album))
        .route(ENDPOINT_ALBUM_UPDATE, post(handle_update_album))
        .route(ENDPOINT_ALBUM_DELETE, post(handle_delete_album))
        .route(ENDPOINT_ALBUM_DELETE_PHOTOS, post(handle_delete_album_photos))
        .route(ENDPOINT_ALBUM_LIST, get(handle_list_albums))
        .route(ENDPOINT_ALBUM_DATA, get(handle_album_data))
        .route(ENDPOINT_ALBUM_EXPORT, get(handle_export_album))
        .route(ENDPOINT_STATS_ORIGIN, get(handle_origin_stats))
        .route(ENDPOINT_STATS_LOCATION, get(handle_location_stats))
        .route(ENDPOINT_STATS_TIME, get(handle_time_stats))
        .route(ENDPOINT_PHOTOS_LOCATION, get(handle_photos_by_location))
        .route(ENDPOINT_PHOTOS_TIME, get(handle_photos_by_time))
        .route(ENDPOINT_CLEAN, post(handle_clean))
        .route("/history", get(handle_history))
        .layer(Extension(Arc::clone(&ctx.registry)))
        .layer(Extension(Arc::clone(&ctx.activity)))
        .layer(Extension(ctx))
}
