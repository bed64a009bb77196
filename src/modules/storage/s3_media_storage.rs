//! S3-compatible media storage using the rust-s3 crate.
//!
//! The bucket must allow anonymous reads under the media prefix for the
//! returned URLs to resolve, e.g. `mc anonymous set download minio/<bucket>/<prefix>`.

use async_trait::async_trait;
use s3::creds::Credentials;
use s3::{Bucket, BucketConfiguration, Region};
use tracing::{debug, info, warn};

use super::{MediaStorage, StorageError};
use crate::core::config::MediaConfig;

pub struct S3MediaStorage {
    bucket: Box<Bucket>,
    region: Region,
    credentials: Credentials,
    endpoint: String,
    public_endpoint: String,
}

impl S3MediaStorage {
    /// Connect to the bucket, creating it when missing
    pub async fn new(config: &MediaConfig) -> Result<Self, StorageError> {
        let credentials = Credentials::new(
            Some(&config.access_key),
            Some(&config.secret_key),
            None,
            None,
            None,
        )
        .map_err(|e| StorageError::Config(format!("invalid credentials: {}", e)))?;

        let region = Region::Custom {
            region: config.region.clone(),
            endpoint: config.endpoint.clone(),
        };

        let mut bucket = Bucket::new(&config.bucket, region.clone(), credentials.clone())
            .map_err(|e| StorageError::Config(format!("invalid bucket: {}", e)))?;

        // MinIO wants http://endpoint/bucket rather than http://bucket.endpoint
        bucket.set_path_style();

        let storage = Self {
            bucket,
            region,
            credentials,
            endpoint: config.endpoint.clone(),
            public_endpoint: config.public_endpoint.clone(),
        };
        storage.ensure_bucket_exists().await;

        info!(
            "Media storage initialized for endpoint: {}, bucket: {}",
            storage.endpoint,
            storage.bucket.name()
        );
        Ok(storage)
    }

    /// Create the bucket if needed. Failures are logged, not fatal: the bucket
    /// may exist under credentials that cannot create buckets.
    async fn ensure_bucket_exists(&self) {
        let result = Bucket::create_with_path_style(
            &self.bucket.name(),
            self.region.clone(),
            self.credentials.clone(),
            BucketConfiguration::default(),
        )
        .await;

        match result {
            Ok(_) => info!("Bucket '{}' created", self.bucket.name()),
            Err(e) => {
                let error_str = e.to_string();
                if error_str.contains("BucketAlreadyOwnedByYou")
                    || error_str.contains("BucketAlreadyExists")
                {
                    debug!("Bucket '{}' already exists", self.bucket.name());
                } else {
                    warn!(
                        "Could not create bucket '{}': {}. Assuming it exists.",
                        self.bucket.name(),
                        e
                    );
                }
            }
        }
    }

    pub fn public_url(&self, key: &str) -> String {
        public_url(&self.public_endpoint, &self.bucket.name(), key)
    }
}

fn public_url(public_endpoint: &str, bucket: &str, key: &str) -> String {
    format!("{}/{}/{}", public_endpoint.trim_end_matches('/'), bucket, key)
}

#[async_trait]
impl MediaStorage for S3MediaStorage {
    async fn put(
        &self,
        key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<String, StorageError> {
        let response = self
            .bucket
            .put_object_with_content_type(key, &data, content_type)
            .await
            .map_err(|e| StorageError::Upload {
                key: key.to_string(),
                message: e.to_string(),
            })?;

        if !(200..300).contains(&response.status_code()) {
            return Err(StorageError::Upload {
                key: key.to_string(),
                message: format!("storage responded with status {}", response.status_code()),
            });
        }

        debug!("Uploaded '{}' to bucket '{}'", key, self.bucket.name());
        Ok(self.public_url(key))
    }
}
