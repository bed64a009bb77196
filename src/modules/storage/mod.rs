//! Storage module for report media
//!
//! Media objects go to an S3-compatible bucket (MinIO in development) and are
//! served from a public endpoint.

mod s3_media_storage;

pub use s3_media_storage::S3MediaStorage;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage is misconfigured: {0}")]
    Config(String),

    #[error("Failed to upload '{key}': {message}")]
    Upload { key: String, message: String },
}

/// Object storage for uploaded media
#[async_trait]
pub trait MediaStorage: Send + Sync {
    /// Store `data` under `key` and return its public URL
    async fn put(&self, key: &str, data: Vec<u8>, content_type: &str)
        -> Result<String, StorageError>;
}
