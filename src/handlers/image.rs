use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::{
    error::Result,
    handlers::Services,
    logger::error_chain,
    models::{HttpResponse, ImageEvent},
    storage::{store_and_sign, ObjectKeys, PresignedUrl, CONTENT_TYPE_PNG},
};

/// Generates one image and answers with a presigned link to it.
///
/// Every failure is logged and turned into a 500; nothing propagates.
pub async fn handle_image_event(payload: Value, services: Services<'_>, now: DateTime<Utc>) -> HttpResponse {
    match generate_and_store(payload, services, now).await {
        Ok(presigned) => {
            log::info!("Successfully generated image and URL.");
            HttpResponse::ok(presigned.url)
        }
        Err(e) => {
            log::error!("Error during image generation: {}", error_chain(&e));
            HttpResponse::internal_error()
        }
    }
}

async fn generate_and_store(payload: Value, services: Services<'_>, now: DateTime<Utc>) -> Result<PresignedUrl> {
    let event: ImageEvent = serde_json::from_value(payload)?;
    let prompt = event.prompt.as_str();
    log::info!("Received prompt: {}", prompt);

    let image = services.generate_image(prompt, now).await?;

    let config = services.config;
    let key = ObjectKeys::new(prompt, now, config.unique_object_keys).image_key();
    store_and_sign(
        services.store,
        &config.bucket_name,
        &key,
        image.bytes,
        CONTENT_TYPE_PNG,
        config.presigned_url_expires_in,
    )
    .await
}
