// Error types for each stage of the scan pipeline
//
// Using thiserror so every stage keeps its own typed error while the
// pipeline can wrap them with `#[from]` and still match on the source.

use std::path::PathBuf;
use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("No API key configured (set ANTHROPIC_API_KEY environment variable)")]
    NoApiKey,

    #[error("Compression quality must be in (0.0, 1.0], got {0}")]
    InvalidQuality(f32),

    #[error("Second pass quality {second} must not exceed first pass quality {first}")]
    QualityOrder { first: f32, second: f32 },

    #[error("Payload ceiling must be > 0 bytes")]
    InvalidCeiling,

    #[error("Invalid API config: {0}")]
    InvalidApiConfig(String),

    #[error("Could not determine a settings location (set SETTINGS_PATH)")]
    NoSettingsPath,
}

/// Persisted settings errors
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to load settings from {path}: {source}")]
    LoadFailed {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to save settings to {path}: {source}")]
    SaveFailed {
        path: String,
        source: std::io::Error,
    },

    #[error("Settings file is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Camera / capture source errors
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("Camera permission not granted")]
    PermissionDenied,

    #[error("Image not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read captured image {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Image optimization errors
#[derive(Debug, Error)]
pub enum EncodingError {
    #[error("Failed to read image {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Image decoding failed: {0}")]
    DecodeFailed(#[from] image::ImageError),

    #[error("JPEG encoding at quality {quality} produced no payload")]
    EmptyPayload { quality: f32 },

    #[error("Task join failed: {0}")]
    TaskJoinFailed(String),
}

/// Translation request errors
#[derive(Debug, Error)]
pub enum TranslationError {
    #[error("Target language not set")]
    TargetLanguageUnset,

    #[error("Failed to read target language: {0}")]
    Settings(#[from] SettingsError),

    #[error("API request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("{}", .message.as_deref().unwrap_or("Failed to process with Claude"))]
    Api { status: u16, message: Option<String> },

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

impl TranslationError {
    /// True for transport and API-level failures (the "network" class).
    pub fn is_network(&self) -> bool {
        matches!(self, Self::RequestFailed(_) | Self::Api { .. })
    }
}

/// Pipeline errors: any of these aborts the run
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Capture failed: {0}")]
    Capture(#[from] CaptureError),

    #[error("Image optimization failed: {0}")]
    Encoding(#[from] EncodingError),

    #[error("Translation failed: {0}")]
    Translation(#[from] TranslationError),
}

impl PipelineError {
    /// Message for the single user-facing alert.
    pub fn user_message(&self) -> String {
        match self {
            Self::Translation(TranslationError::Api {
                message: Some(message),
                ..
            }) => message.clone(),
            Self::Translation(e) if e.is_network() => "API Error".to_string(),
            _ => "Failed to process image. Please try again.".to_string(),
        }
    }
}

pub type SettingsResult<T> = Result<T, SettingsError>;
pub type TranslationResult<T> = Result<T, TranslationError>;
pub type PipelineResult<T> = Result<T, PipelineError>;
