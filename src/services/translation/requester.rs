use std::sync::Arc;
use tracing::{debug, info, instrument};

use super::api_client::{ContentBlock, ImageSource, Message, MessagesRequest, VisionBackend};
use super::prompt::build_instruction;
use crate::core::config::ApiConfig;
use crate::core::errors::{TranslationError, TranslationResult};
use crate::core::types::OptimizedImage;
use crate::services::settings::Settings;

/// Model parameters fixed for every request
#[derive(Debug, Clone)]
pub struct ModelOptions {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl From<&ApiConfig> for ModelOptions {
    fn from(config: &ApiConfig) -> Self {
        Self {
            model: config.ocr_translation_model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        }
    }
}

/// Packages the payload and the stored target language into one API call.
pub struct TranslationRequester {
    settings: Settings,
    backend: Arc<dyn VisionBackend>,
    options: ModelOptions,
}

impl TranslationRequester {
    pub fn new(settings: Settings, backend: Arc<dyn VisionBackend>, options: ModelOptions) -> Self {
        Self {
            settings,
            backend,
            options,
        }
    }

    /// Returns the raw reply text. The target language is read on every call
    /// and its absence fails before anything is sent.
    #[instrument(skip(self, image), fields(payload_bytes = image.approx_bytes()))]
    pub async fn request(&self, image: &OptimizedImage) -> TranslationResult<String> {
        let target_language = self
            .settings
            .target_language()
            .await?
            .ok_or(TranslationError::TargetLanguageUnset)?;

        info!("Requesting OCR translation to {}", target_language);
        let request = build_request(&self.options, &image.base64, &target_language);
        let reply = self.backend.send(&request).await?;
        debug!("Raw reply: {}", reply);

        Ok(reply)
    }
}

pub fn build_request(options: &ModelOptions, image_base64: &str, target_language: &str) -> MessagesRequest {
    MessagesRequest {
        model: options.model.clone(),
        max_tokens: options.max_tokens,
        temperature: options.temperature,
        messages: vec![Message {
            role: "user".to_string(),
            content: vec![
                ContentBlock::Text {
                    text: build_instruction(target_language),
                },
                ContentBlock::Image {
                    source: ImageSource::jpeg_base64(image_base64.to_string()),
                },
            ],
        }],
    }
}
