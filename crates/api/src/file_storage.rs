//! File storage providers selected by configuration.

use std::sync::Arc;

use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use intake_core::error::CoreError;
use intake_core::file_storage::{public_url, FileStorage, LocalFileStorage, UploadFile};

use crate::config::{FileStorageBackend, FileStorageConfig};

/// Stores files as objects in an S3 bucket.
#[derive(Clone)]
pub struct S3FileStorage {
    client: aws_sdk_s3::Client,
    bucket: String,
    public_base_url: String,
}

impl S3FileStorage {
    pub fn new(
        client: aws_sdk_s3::Client,
        bucket: impl Into<String>,
        public_base_url: impl Into<String>,
    ) -> Self {
        Self {
            client,
            bucket: bucket.into(),
            public_base_url: public_base_url.into(),
        }
    }

    /// Build a client from the standard AWS environment (region, credentials).
    pub async fn from_env(bucket: impl Into<String>, public_base_url: impl Into<String>) -> Self {
        let sdk_config = aws_config::load_from_env().await;
        Self::new(
            aws_sdk_s3::Client::new(&sdk_config),
            bucket,
            public_base_url,
        )
    }
}

#[async_trait]
impl FileStorage for S3FileStorage {
    fn provider(&self) -> &'static str {
        "s3"
    }

    async fn store(&self, key: &str, file: &UploadFile) -> Result<String, CoreError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(&file.content_type)
            .body(ByteStream::from(file.data.clone()))
            .send()
            .await
            .map_err(|e| {
                CoreError::Upstream(format!(
                    "S3 PutObject failed for '{key}': {}",
                    aws_sdk_s3::error::DisplayErrorContext(&e)
                ))
            })?;

        tracing::debug!(bucket = %self.bucket, key, bytes = file.data.len(), "Stored file in S3");
        Ok(public_url(&self.public_base_url, key))
    }
}

/// Build the provider named by the configuration.
pub async fn build_file_storage(config: &FileStorageConfig) -> Arc<dyn FileStorage> {
    match &config.backend {
        FileStorageBackend::Local { dir } => {
            tracing::info!(dir = %dir.display(), "Using local file storage");
            Arc::new(LocalFileStorage::new(dir.clone(), config.public_url.clone()))
        }
        FileStorageBackend::S3 { bucket } => {
            tracing::info!(%bucket, "Using S3 file storage");
            Arc::new(S3FileStorage::from_env(bucket.clone(), config.public_url.clone()).await)
        }
    }
}
