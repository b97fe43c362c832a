use crate::{
    bedrock::ImageGenerator,
    error::{FunctionError, Result},
    models::{CanvasImageResponse, GeneratedImage, ImageGenerationRequest},
};
use async_trait::async_trait;
use aws_sdk_bedrockruntime::{error::DisplayErrorContext, primitives::Blob, Client};
use base64::{engine::general_purpose::STANDARD, Engine as _};

#[derive(Clone)]
pub struct ImageClient {
    client: Client,
}

impl ImageClient {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ImageGenerator for ImageClient {
    async fn generate(&self, request: &ImageGenerationRequest) -> Result<GeneratedImage> {
        let request_json = serde_json::to_vec(&request.to_canvas_body())?;

        log::info!(
            "Calling Bedrock model: {} (seed={}, {}x{}, quality={})",
            request.model_id,
            request.seed,
            request.width,
            request.height,
            request.quality
        );
        log::debug!(
            "Image generation request payload: {}",
            String::from_utf8_lossy(&request_json)
        );

        let response = self
            .client
            .invoke_model()
            .model_id(&request.model_id)
            .content_type("application/json")
            .accept("application/json")
            .body(Blob::new(request_json))
            .send()
            .await
            .map_err(|e| FunctionError::ImageService(DisplayErrorContext(&e).to_string()))?;

        let bytes = decode_first_image(response.body.as_ref())?;
        log::info!("Decoded {} image bytes from {}", bytes.len(), request.model_id);

        Ok(GeneratedImage {
            bytes,
            model: request.model_id.clone(),
        })
    }
}

/// Parses a model response body and decodes `images[0]` from base64.
pub fn decode_first_image(body: &[u8]) -> Result<Vec<u8>> {
    let response: CanvasImageResponse = serde_json::from_slice(body)
        .map_err(|e| FunctionError::Response(e.to_string()))?;

    if let Some(error) = response.error.filter(|e| !e.is_empty()) {
        return Err(FunctionError::Response(error));
    }

    let first = response
        .images
        .first()
        .ok_or_else(|| FunctionError::Response("No images generated".into()))?;

    Ok(STANDARD.decode(first)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_first_image_only() {
        let body = json!({
            "images": [STANDARD.encode(b"\x89PNG first"), STANDARD.encode(b"second")]
        })
        .to_string();
        assert_eq!(decode_first_image(body.as_bytes()).unwrap(), b"\x89PNG first");
    }

    #[test]
    fn test_empty_images_is_response_error() {
        let err = decode_first_image(br#"{"images": []}"#).unwrap_err();
        assert!(matches!(err, FunctionError::Response(ref m) if m == "No images generated"));
    }

    #[test]
    fn test_model_error_field_is_surfaced() {
        let err = decode_first_image(br#"{"images": [], "error": "content filtered"}"#).unwrap_err();
        assert_eq!(err.to_string(), "Response error: content filtered");
    }

    #[test]
    fn test_bad_base64_is_decode_error() {
        let err = decode_first_image(br#"{"images": ["not base64!!"]}"#).unwrap_err();
        assert!(matches!(err, FunctionError::Decode(_)));
    }

    #[test]
    fn test_non_json_body() {
        let err = decode_first_image(b"<html>").unwrap_err();
        assert!(matches!(err, FunctionError::Response(_)));
    }
}
