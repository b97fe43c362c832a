use std::sync::Mutex;

use async_trait::async_trait;

use crate::{
    bedrock::ImageGenerator,
    error::{FunctionError, Result},
    models::{GeneratedImage, ImageGenerationRequest},
    storage::{ObjectStore, PresignedUrl},
};

pub const FAKE_PNG: &[u8] = b"\x89PNG\r\n\x1a\nfake";

#[derive(Default)]
pub struct FakeImageGenerator {
    pub failure: Option<String>,
    pub requests: Mutex<Vec<ImageGenerationRequest>>,
}

impl FakeImageGenerator {
    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Default::default()
        }
    }
}

#[async_trait]
impl ImageGenerator for FakeImageGenerator {
    async fn generate(&self, request: &ImageGenerationRequest) -> Result<GeneratedImage> {
        self.requests.lock().unwrap().push(request.clone());
        match &self.failure {
            Some(message) => Err(FunctionError::ImageService(message.clone())),
            None => Ok(GeneratedImage {
                bytes: FAKE_PNG.to_vec(),
                model: request.model_id.clone(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StoredObject {
    pub bucket: String,
    pub key: String,
    pub body: Vec<u8>,
    pub content_type: String,
}

#[derive(Default)]
pub struct MemoryObjectStore {
    pub fail_puts: bool,
    pub objects: Mutex<Vec<StoredObject>>,
}

impl MemoryObjectStore {
    pub fn stored(&self) -> Vec<StoredObject> {
        self.objects.lock().unwrap().clone()
    }
}

pub fn fake_url(bucket: &str, key: &str, expires_in_secs: u64) -> String {
    format!(
        "https://{}.s3.amazonaws.com/{}?X-Amz-Expires={}&X-Amz-Signature=fake",
        bucket, key, expires_in_secs
    )
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<()> {
        if self.fail_puts {
            return Err(FunctionError::Storage("AccessDenied".into()));
        }
        self.objects.lock().unwrap().push(StoredObject {
            bucket: bucket.to_string(),
            key: key.to_string(),
            body,
            content_type: content_type.to_string(),
        });
        Ok(())
    }

    async fn presign_get(&self, bucket: &str, key: &str, expires_in_secs: u64) -> Result<PresignedUrl> {
        Ok(PresignedUrl::new(
            bucket,
            key,
            fake_url(bucket, key, expires_in_secs),
            expires_in_secs,
        ))
    }
}
