use std::sync::Arc;

use uuid::Uuid;

use crate::core::config::IdentityConfig;
use crate::core::error::{AppError, Result};
use crate::features::auth::session::ReporterSession;
use crate::features::issues::services::resolve_reporter_id;
use crate::features::media::dtos::{
    extension_for_content_type, is_media_type_allowed, MediaUploadResponseDto,
    ALLOWED_MEDIA_TYPES, MAX_MEDIA_SIZE,
};
use crate::modules::storage::MediaStorage;

/// Stores report photos and videos
pub struct MediaService {
    storage: Arc<dyn MediaStorage>,
    identity: IdentityConfig,
    prefix: String,
}

impl MediaService {
    pub fn new(storage: Arc<dyn MediaStorage>, identity: IdentityConfig, prefix: String) -> Self {
        Self {
            storage,
            identity,
            prefix,
        }
    }

    /// Object key for a new upload: `{prefix}/{reporter}/{uuid}.{ext}`
    fn object_key(&self, reporter_id: &str, content_type: &str) -> String {
        format!(
            "{}/{}/{}.{}",
            self.prefix.trim_matches('/'),
            key_segment(reporter_id),
            Uuid::new_v4(),
            extension_for_content_type(content_type)
        )
    }

    pub async fn upload(
        &self,
        session: &ReporterSession,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<MediaUploadResponseDto> {
        let reporter_id = resolve_reporter_id(session, &self.identity)
            .map_err(|e| AppError::Unauthorized(e.to_string()))?;

        if data.is_empty() {
            return Err(AppError::BadRequest("File is empty".to_string()));
        }
        if data.len() > MAX_MEDIA_SIZE {
            return Err(AppError::BadRequest(format!(
                "File too large. Maximum size is {} MB",
                MAX_MEDIA_SIZE / 1024 / 1024
            )));
        }
        if !is_media_type_allowed(content_type) {
            return Err(AppError::BadRequest(format!(
                "File type '{}' is not allowed. Allowed types: {}",
                content_type,
                ALLOWED_MEDIA_TYPES.join(", ")
            )));
        }

        let key = self.object_key(&reporter_id, content_type);
        let size = data.len();
        let url = self
            .storage
            .put(&key, data, content_type)
            .await
            .map_err(|e| AppError::ExternalServiceError(e.to_string()))?;

        tracing::info!("Stored media {} ({} bytes) for {}", key, size, reporter_id);
        Ok(MediaUploadResponseDto {
            url,
            key,
            content_type: content_type.to_string(),
            size,
        })
    }
}

/// Reporter ids come from token subjects (`auth0|abc`, emails, ...).
/// Keep one URL-safe path segment: anything outside `[A-Za-z0-9._-]` becomes `_`.
fn key_segment(reporter_id: &str) -> String {
    let segment: String = reporter_id
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();

    match segment.trim_matches('.') {
        "" => "_".to_string(),
        _ => segment,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::InMemoryMediaStorage;

    fn service(storage: Arc<InMemoryMediaStorage>) -> MediaService {
        MediaService::new(storage, IdentityConfig::default(), "issue-media".to_string())
    }

    #[tokio::test]
    async fn test_upload_uses_reporter_scoped_key() {
        let storage = Arc::new(InMemoryMediaStorage::new());
        let result = service(storage.clone())
            .upload(
                &ReporterSession::authenticated("citizen-8"),
                vec![0xFF, 0xD8, 0xFF],
                "image/jpeg",
            )
            .await
            .unwrap();

        assert!(result.key.starts_with("issue-media/citizen-8/"));
        assert!(result.key.ends_with(".jpg"));
        assert_eq!(result.url, format!("https://media.test/{}", result.key));
        assert_eq!(result.size, 3);
        assert_eq!(storage.keys(), vec![result.key]);
    }

    #[tokio::test]
    async fn test_upload_key_keeps_reporter_in_one_segment() {
        let storage = Arc::new(InMemoryMediaStorage::new());
        let result = service(storage)
            .upload(
                &ReporterSession::authenticated("auth0|abc/../x"),
                vec![1, 2],
                "image/png",
            )
            .await
            .unwrap();

        assert!(result.key.starts_with("issue-media/auth0_abc_.._x/"));
        assert_eq!(result.key.split('/').count(), 3);
    }

    #[test]
    fn test_key_segment() {
        assert_eq!(key_segment("citizen-8"), "citizen-8");
        assert_eq!(key_segment("auth0|abc"), "auth0_abc");
        assert_eq!(key_segment("a/b"), "a_b");
        assert_eq!(key_segment(".."), "_");
    }

    #[tokio::test]
    async fn test_upload_rejects_disallowed_type() {
        let storage = Arc::new(InMemoryMediaStorage::new());
        let result = service(storage.clone())
            .upload(
                &ReporterSession::authenticated("citizen-8"),
                b"<html>".to_vec(),
                "text/html",
            )
            .await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
        assert!(storage.keys().is_empty());
    }

    #[tokio::test]
    async fn test_upload_rejects_oversized_file() {
        let storage = Arc::new(InMemoryMediaStorage::new());
        let result = service(storage)
            .upload(
                &ReporterSession::authenticated("citizen-8"),
                vec![0; MAX_MEDIA_SIZE + 1],
                "video/mp4",
            )
            .await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_upload_requires_reporter() {
        let storage = Arc::new(InMemoryMediaStorage::new());
        let result = service(storage)
            .upload(&ReporterSession::anonymous(), vec![1], "image/png")
            .await;

        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }
}
