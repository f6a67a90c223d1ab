pub mod capture;
pub mod optimizer;
pub mod settings;
pub mod translation;

// Re-export commonly used services
pub use capture::{FileCapturer, ImageCapturer};
pub use optimizer::{ImageOptimizer, PayloadEncoder};
pub use settings::{FileSettingsStore, MemorySettingsStore, Settings, SettingsStore};
pub use translation::{ApiClient, TranslationRequester, VisionBackend};
