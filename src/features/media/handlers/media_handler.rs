use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use tracing::debug;

use crate::core::error::{AppError, Result};
use crate::features::auth::session::ReporterSession;
use crate::features::media::dtos::{MediaUploadResponseDto, UploadMediaDto};
use crate::features::media::services::MediaService;
use crate::shared::types::ApiResponse;

/// Upload a photo or video for a report
///
/// Accepts multipart/form-data with a single `file` field. The returned URL
/// goes into the report's `mediaUrls`.
#[utoipa::path(
    post,
    path = "/api/media",
    tag = "media",
    request_body(
        content = UploadMediaDto,
        content_type = "multipart/form-data",
    ),
    responses(
        (status = 201, description = "Media stored", body = ApiResponse<MediaUploadResponseDto>),
        (status = 400, description = "Missing, empty, oversized or unsupported file"),
        (status = 401, description = "Reporter is not authenticated")
    ),
    security((), ("bearer_auth" = []))
)]
pub async fn upload_media(
    session: ReporterSession,
    State(service): State<Arc<MediaService>>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<MediaUploadResponseDto>>)> {
    let mut upload: Option<(Vec<u8>, String)> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        debug!("Failed to read multipart field: {}", e);
        AppError::BadRequest(format!("Failed to read multipart data: {}", e))
    })? {
        if field.name() != Some("file") {
            debug!("Ignoring multipart field: {:?}", field.name());
            continue;
        }

        if upload.is_some() {
            return Err(AppError::BadRequest(
                "Only one file can be uploaded per request".to_string(),
            ));
        }

        let content_type = field
            .content_type()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "application/octet-stream".to_string());
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(format!("Failed to read file data: {}", e)))?;
        upload = Some((data.to_vec(), content_type));
    }

    let (data, content_type) =
        upload.ok_or_else(|| AppError::BadRequest("File is required".to_string()))?;

    let response = service.upload(&session, data, &content_type).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(response), None, None)),
    ))
}
