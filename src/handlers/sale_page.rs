use chrono::{DateTime, Utc};

use crate::{
    error::Result,
    handlers::Services,
    models::{AgentActionEvent, AgentActionResponse},
    page::render_sale_page,
    storage::{store_and_sign, ObjectKeys, CONTENT_TYPE_HTML, CONTENT_TYPE_PNG},
};

/// Generates an image, renders a sale page around it and returns a presigned
/// link to the page inside the agent response envelope.
///
/// Errors are not caught here; the runtime reports them to the caller.
pub async fn handle_sale_page_event(
    event: &AgentActionEvent,
    services: Services<'_>,
    now: DateTime<Utc>,
) -> Result<AgentActionResponse> {
    let input = event.sale_page_input();
    log::info!("Event received: {}", serde_json::to_string(event)?);
    log::info!("Received prompt: {}, text: {}", input.prompt, input.text);

    let config = services.config;
    let bucket = config.bucket_name.as_str();
    let expires_in = config.presigned_url_expires_in;
    let keys = ObjectKeys::new(&input.prompt, now, config.unique_object_keys);

    let image = services.generate_image(&input.prompt, now).await?;
    let image_url = store_and_sign(
        services.store,
        bucket,
        &keys.sale_image_key(),
        image.bytes,
        CONTENT_TYPE_PNG,
        expires_in,
    )
    .await?;

    let html = render_sale_page(&image_url.url, &input.text);
    let page_url = store_and_sign(
        services.store,
        bucket,
        &keys.page_key(),
        html.into_bytes(),
        CONTENT_TYPE_HTML,
        expires_in,
    )
    .await?;
    log::info!("Generated HTML page {}", page_url.url);

    let response = event.respond_with_text(page_url.url);
    log::info!("Response: {}", serde_json::to_string(&response)?);
    Ok(response)
}
