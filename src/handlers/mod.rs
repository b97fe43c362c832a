pub mod image;
pub mod market_data;
pub mod sale_page;

#[cfg(test)]
pub(crate) mod test_support;

use chrono::{DateTime, Utc};

use crate::{
    bedrock::ImageGenerator,
    config::FunctionConfig,
    error::Result,
    logger::{self, error_chain},
    models::{GeneratedImage, ImageGenerationRequest},
    storage::ObjectStore,
};

pub use image::handle_image_event;
pub use market_data::{handle_market_event, parse_symbol};
pub use sale_page::handle_sale_page_event;

/// Clients and settings borrowed by every invocation.
#[derive(Clone, Copy)]
pub struct Services<'a> {
    pub images: &'a dyn ImageGenerator,
    pub store: &'a dyn ObjectStore,
    pub config: &'a FunctionConfig,
}

impl<'a> Services<'a> {
    pub fn new(
        images: &'a dyn ImageGenerator,
        store: &'a dyn ObjectStore,
        config: &'a FunctionConfig,
    ) -> Self {
        Self {
            images,
            store,
            config,
        }
    }

    pub async fn generate_image(&self, prompt: &str, now: DateTime<Utc>) -> Result<GeneratedImage> {
        let _timer = logger::timer("image generation");
        let request = ImageGenerationRequest::from_settings(prompt, &self.config.image, now);
        self.images.generate(&request).await.map_err(|e| {
            log::error!("Error generating image: {}", error_chain(&e));
            e
        })
    }
}
