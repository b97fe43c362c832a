pub mod image_client;

use crate::{
    config::AwsConfig,
    error::Result,
    models::{GeneratedImage, ImageGenerationRequest},
};
use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_sdk_bedrockruntime::config::Credentials;

pub use image_client::{decode_first_image, ImageClient};

#[async_trait]
pub trait ImageGenerator: Send + Sync {
    async fn generate(&self, request: &ImageGenerationRequest) -> Result<GeneratedImage>;
}

/// Loads shared SDK settings, using static credentials when both halves are set
/// and the default provider chain otherwise.
pub async fn load_sdk_config(config: &AwsConfig) -> SdkConfig {
    let mut loader = aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(config.region_or_default().to_string()));

    if let (Some(access_key), Some(secret_key)) = (&config.access_key, &config.secret_key) {
        loader = loader.credentials_provider(Credentials::new(
            access_key,
            secret_key,
            None,
            None,
            "rgenpage",
        ));
    }

    if let Some(endpoint_url) = &config.endpoint_url {
        loader = loader.endpoint_url(endpoint_url);
    }

    loader.load().await
}

impl ImageClient {
    pub async fn from_config(config: &AwsConfig) -> Self {
        let sdk_config = load_sdk_config(config).await;
        Self::new(aws_sdk_bedrockruntime::Client::new(&sdk_config))
    }
}
