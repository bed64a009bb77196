use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Upload form for OpenAPI documentation only.
/// The handler reads the multipart body directly.
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct UploadMediaDto {
    /// Photo or video of the issue
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub file: String,
}

/// Uploaded media; pass `url` in a report's `mediaUrls`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MediaUploadResponseDto {
    pub url: String,
    pub key: String,
    pub content_type: String,
    pub size: usize,
}

/// MIME types accepted as report media
pub const ALLOWED_MEDIA_TYPES: &[&str] = &[
    "image/jpeg",
    "image/png",
    "image/gif",
    "image/webp",
    "image/heic",
    "video/mp4",
    "video/quicktime",
    "video/webm",
];

/// Maximum media size (20 MB)
pub const MAX_MEDIA_SIZE: usize = 20 * 1024 * 1024;

pub fn is_media_type_allowed(content_type: &str) -> bool {
    ALLOWED_MEDIA_TYPES.contains(&content_type)
}

pub fn extension_for_content_type(content_type: &str) -> &'static str {
    match content_type {
        "image/jpeg" => "jpg",
        "image/png" => "png",
        "image/gif" => "gif",
        "image/webp" => "webp",
        "image/heic" => "heic",
        "video/mp4" => "mp4",
        "video/quicktime" => "mov",
        "video/webm" => "webm",
        _ => "bin",
    }
}
