// Library exports for the photo OCR + translation workflow

pub mod core;
pub mod orchestration;
pub mod presentation;
pub mod services;
pub mod utils;

// Re-export commonly used types and functions
pub use self::core::{
    config::Config,
    errors::{
        CaptureError, ConfigError, EncodingError, PipelineError, SettingsError, TranslationError,
    },
    types::{
        CaptureResult, CompressionPass, OptimizedImage, PermissionStatus, PipelineState,
        RunOutcome, TranslationResponse,
    },
};

pub use orchestration::{Onboarding, OnboardingOutcome, Route, ScanPipeline, SupportedLanguage};

pub use presentation::{parse_result, render_text, ResultView};

pub use services::{
    ApiClient, FileCapturer, FileSettingsStore, ImageCapturer, ImageOptimizer,
    MemorySettingsStore, Settings, SettingsStore, TranslationRequester, VisionBackend,
};

pub use utils::{Metrics, MetricsSnapshot};
