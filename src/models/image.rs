use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::ImageSettings;

pub const SEED_MODULUS: i64 = 100_000;

#[derive(Debug, Clone, PartialEq)]
pub struct ImageGenerationRequest {
    pub prompt: String,
    pub model_id: String,
    pub width: u32,
    pub height: u32,
    pub quality: String,
    pub cfg_scale: f32,
    pub num_images: u32,
    pub seed: u32,
}

impl ImageGenerationRequest {
    /// Builds a request from the fixed settings, seeding from the wall clock.
    pub fn from_settings(prompt: impl Into<String>, settings: &ImageSettings, now: DateTime<Utc>) -> Self {
        Self {
            prompt: prompt.into(),
            model_id: settings.model_id.clone(),
            width: settings.width,
            height: settings.height,
            quality: settings.quality.clone(),
            cfg_scale: settings.cfg_scale,
            num_images: settings.number_of_images,
            seed: seed_from_time(now),
        }
    }

    pub fn to_canvas_body(&self) -> CanvasRequest {
        CanvasRequest {
            task_type: "TEXT_IMAGE".to_string(),
            text_to_image_params: TextToImageParams {
                text: self.prompt.clone(),
            },
            image_generation_config: ImageGenerationConfig {
                cfg_scale: self.cfg_scale,
                seed: self.seed,
                quality: self.quality.clone(),
                width: self.width,
                height: self.height,
                number_of_images: self.num_images,
            },
        }
    }
}

/// Not reproducible; only varies output between calls.
pub fn seed_from_time(now: DateTime<Utc>) -> u32 {
    now.timestamp().rem_euclid(SEED_MODULUS) as u32
}

#[derive(Debug, Clone)]
pub struct GeneratedImage {
    pub bytes: Vec<u8>,
    pub model: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CanvasRequest {
    pub task_type: String,
    pub text_to_image_params: TextToImageParams,
    pub image_generation_config: ImageGenerationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TextToImageParams {
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ImageGenerationConfig {
    pub cfg_scale: f32,
    pub seed: u32,
    pub quality: String,
    pub width: u32,
    pub height: u32,
    pub number_of_images: u32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CanvasImageResponse {
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub error: Option<String>,
}
