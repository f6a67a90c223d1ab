// Data carried between pipeline stages

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Handle to a captured photo. Lives for a single pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureResult {
    pub image_path: PathBuf,
}

/// Camera permission as reported by the capture device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionStatus {
    Granted,
    Denied,
}

impl PermissionStatus {
    pub fn is_granted(self) -> bool {
        self == Self::Granted
    }
}

/// Which compression tier produced the payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CompressionPass {
    First,
    Second,
}

/// Base64 JPEG payload ready for inline transmission
#[derive(Debug, Clone)]
pub struct OptimizedImage {
    pub base64: String,
    pub quality: f32,
    pub pass: CompressionPass,
}

impl OptimizedImage {
    /// Estimated decoded size (base64 expands raw bytes by ~4/3)
    pub fn approx_bytes(&self) -> usize {
        approx_decoded_len(&self.base64)
    }
}

pub fn approx_decoded_len(base64: &str) -> usize {
    (base64.len() as f64 * 0.75) as usize
}

/// Structured reply the model is instructed to return
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationResponse {
    pub original_text: String,
    pub translation: String,
    pub source_language: String,
    pub target_language: String,
}

/// Pipeline run state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineState {
    Idle,
    Capturing,
    Optimizing,
    Requesting,
    Done,
    Failed,
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Capturing => "capturing",
            Self::Optimizing => "optimizing",
            Self::Requesting => "requesting",
            Self::Done => "done",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Result of asking the pipeline to run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Raw reply text for the result view, not yet parsed
    Completed { raw_reply: String },
    /// Another run was in flight; nothing was done
    AlreadyRunning,
}
