pub mod config;
pub mod errors;
pub mod types;

// Re-export commonly used items for convenience
pub use config::{ApiConfig, CompressionConfig, Config};
pub use errors::{
    CaptureError, ConfigError, EncodingError, PipelineError, SettingsError, TranslationError,
};
pub use types::{
    CaptureResult, CompressionPass, OptimizedImage, PermissionStatus, PipelineState, RunOutcome,
    TranslationResponse,
};
