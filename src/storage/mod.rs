pub mod keys;
pub mod s3;

use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

pub use keys::{sanitize_prompt, ObjectKeys};
pub use s3::S3ObjectStore;

pub const CONTENT_TYPE_PNG: &str = "image/png";
pub const CONTENT_TYPE_HTML: &str = "text/html";

/// A time-limited read link to one stored object.
#[derive(Debug, Clone, PartialEq)]
pub struct PresignedUrl {
    pub bucket: String,
    pub key: String,
    pub url: String,
    pub expires_in_secs: u64,
    pub expires_at: DateTime<Utc>,
}

impl PresignedUrl {
    pub fn new(
        bucket: impl Into<String>,
        key: impl Into<String>,
        url: impl Into<String>,
        expires_in_secs: u64,
    ) -> Self {
        let seconds = i64::try_from(expires_in_secs).unwrap_or(i64::MAX);
        let expires_at = Duration::try_seconds(seconds)
            .and_then(|ttl| Utc::now().checked_add_signed(ttl))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        Self {
            bucket: bucket.into(),
            key: key.into(),
            url: url.into(),
            expires_in_secs,
            expires_at,
        }
    }
}

#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<()>;

    async fn presign_get(&self, bucket: &str, key: &str, expires_in_secs: u64) -> Result<PresignedUrl>;
}

/// Writes the object, then issues a signed read link for it.
pub async fn store_and_sign(
    store: &dyn ObjectStore,
    bucket: &str,
    key: &str,
    body: Vec<u8>,
    content_type: &str,
    expires_in_secs: u64,
) -> Result<PresignedUrl> {
    log::info!("Uploading {} ({} bytes, {}) to bucket '{}'", key, body.len(), content_type, bucket);
    store.put_object(bucket, key, body, content_type).await?;

    log::info!("Generating pre-signed URL for {} (expires in {}s)", key, expires_in_secs);
    let presigned = store.presign_get(bucket, key, expires_in_secs).await?;
    log::debug!("Pre-signed URL for {} expires at {}", key, presigned.expires_at.to_rfc3339());
    Ok(presigned)
}
