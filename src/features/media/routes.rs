use axum::{extract::DefaultBodyLimit, routing::post, Router};
use std::sync::Arc;

use crate::features::media::dtos::MAX_MEDIA_SIZE;
use crate::features::media::handlers::upload_media;
use crate::features::media::services::MediaService;

/// Create routes for the media feature
pub fn routes(media_service: Arc<MediaService>) -> Router {
    Router::new()
        .route(
            "/api/media",
            // Room for multipart overhead on top of the file itself
            post(upload_media).layer(DefaultBodyLimit::max(MAX_MEDIA_SIZE + 1024 * 1024)),
        )
        .with_state(media_service)
}
