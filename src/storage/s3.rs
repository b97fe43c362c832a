use std::time::Duration;

use crate::{
    bedrock::load_sdk_config,
    config::AwsConfig,
    error::{FunctionError, Result},
    storage::{ObjectStore, PresignedUrl},
};
use async_trait::async_trait;
use aws_sdk_s3::{
    error::DisplayErrorContext, presigning::PresigningConfig, primitives::ByteStream, Client,
};

#[derive(Clone)]
pub struct S3ObjectStore {
    client: Client,
}

impl S3ObjectStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub async fn from_config(config: &AwsConfig) -> Self {
        let sdk_config = load_sdk_config(config).await;
        Self::new(Client::new(&sdk_config))
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<()> {
        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(ByteStream::from(body))
            .content_type(content_type)
            .send()
            .await
            .map(|_| ())
            .map_err(|e| {
                FunctionError::Storage(format!(
                    "failed to write {} to s3 bucket {}: {}",
                    key,
                    bucket,
                    DisplayErrorContext(&e)
                ))
            })
    }

    async fn presign_get(&self, bucket: &str, key: &str, expires_in_secs: u64) -> Result<PresignedUrl> {
        let presigning = PresigningConfig::expires_in(Duration::from_secs(expires_in_secs))
            .map_err(|e| FunctionError::Config(format!("invalid presign expiry: {}", e)))?;

        let request = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .presigned(presigning)
            .await
            .map_err(|e| {
                FunctionError::Storage(format!(
                    "failed to presign {} in bucket {}: {}",
                    key,
                    bucket,
                    DisplayErrorContext(&e)
                ))
            })?;

        Ok(PresignedUrl::new(bucket, key, request.uri().to_string(), expires_in_secs))
    }
}
