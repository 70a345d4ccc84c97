//! S3-compatible object storage.

use crate::Storage;
use aws_config::BehaviorVersion;
use aws_sdk_s3::Client as S3Client;
use aws_sdk_s3::config::{Credentials, Region};
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::operation::get_object::GetObjectError;
use aws_sdk_s3::primitives::ByteStream;
use cellq_core::settings::StorageSettings;
use cellq_core::{CellqError, Result};
use tracing::{debug, info};

/// Object storage in one S3 bucket.
///
/// Reads share a client. Every write builds its own client from the shared
/// configuration, so no writer outlives the operation it was made for;
/// idle connections get closed by the endpoint during long computations.
pub struct S3Storage {
    config: aws_sdk_s3::Config,
    bucket: String,
    reader: S3Client,
}

impl S3Storage {
    pub async fn connect(settings: &StorageSettings) -> Self {
        let credentials = Credentials::new(
            &settings.access_key,
            &settings.secret_key,
            None,
            None,
            "cellq-settings",
        );
        let shared = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(settings.region.clone()))
            .endpoint_url(&settings.endpoint)
            .credentials_provider(credentials)
            .load()
            .await;
        let config = aws_sdk_s3::config::Builder::from(&shared)
            .force_path_style(true)
            .build();

        info!(
            endpoint = %settings.endpoint,
            bucket = %settings.bucket,
            "Object storage configured"
        );

        Self {
            reader: S3Client::from_conf(config.clone()),
            config,
            bucket: settings.bucket.clone(),
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    fn writer(&self) -> S3Client {
        S3Client::from_conf(self.config.clone())
    }
}

impl Storage for S3Storage {
    async fn get(&self, key: &str) -> Result<Vec<u8>> {
        debug!(bucket = %self.bucket, key = %key, "Downloading object");

        let response = self
            .reader
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|err| match err.into_service_error() {
                GetObjectError::NoSuchKey(_) => CellqError::ObjectNotFound(key.to_string()),
                other => CellqError::Storage(format!(
                    "Failed to download {} from bucket {}: {}",
                    key,
                    self.bucket,
                    DisplayErrorContext(&other)
                )),
            })?;

        let body = response.body.collect().await.map_err(|err| {
            CellqError::Storage(format!("Failed to read object body for {}: {}", key, err))
        })?;

        Ok(body.into_bytes().to_vec())
    }

    async fn put(&self, key: &str, body: Vec<u8>, content_type: &str) -> Result<()> {
        debug!(bucket = %self.bucket, key = %key, bytes = body.len(), "Uploading object");

        self.writer()
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(body))
            .content_type(content_type)
            .send()
            .await
            .map_err(|err| {
                CellqError::Storage(format!(
                    "Failed to upload {} to bucket {}: {}",
                    key,
                    self.bucket,
                    DisplayErrorContext(&err)
                ))
            })?;

        Ok(())
    }
}
