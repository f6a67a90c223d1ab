use crate::core::errors::ConfigError;
use directories::ProjectDirs;
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use tracing::Level;

/// Anthropic Messages API configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub api_key: String,
    pub base_url: String,
    pub anthropic_version: String,
    pub ocr_translation_model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    /// None keeps the HTTP client's own default
    pub timeout: Option<Duration>,
}

/// Two-tier JPEG recompression policy
#[derive(Debug, Clone)]
pub struct CompressionConfig {
    pub first_pass_quality: f32,
    pub second_pass_quality: f32,
    /// Ceiling on the estimated decoded payload size (base64 length * 0.75)
    pub payload_ceiling_bytes: usize,
}

impl Default for CompressionConfig {
    fn default() -> Self {
        Self {
            first_pass_quality: 0.65,
            second_pass_quality: 0.50,
            payload_ceiling_bytes: 5 * 1024 * 1024,
        }
    }
}

/// Persisted settings location
#[derive(Debug, Clone)]
pub struct SettingsConfig {
    pub path: PathBuf,
}

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub api: ApiConfig,
    pub compression: CompressionConfig,
    pub settings: SettingsConfig,
    pub log_level: Level,
}

impl Config {
    pub fn new() -> Result<Self, ConfigError> {
        // Load .env file if it exists
        let _ = dotenvy::dotenv();

        let config = Self::load_from_env()?;
        config.validate()?;
        Ok(config)
    }

    fn load_from_env() -> Result<Self, ConfigError> {
        let log_level = env::var("LOG_LEVEL")
            .ok()
            .and_then(|s| match s.to_lowercase().as_str() {
                "trace" => Some(Level::TRACE),
                "debug" => Some(Level::DEBUG),
                "info" => Some(Level::INFO),
                "warn" | "warning" => Some(Level::WARN),
                "error" => Some(Level::ERROR),
                _ => None,
            })
            .unwrap_or(Level::INFO);

        let settings_path = match env::var("SETTINGS_PATH").ok().filter(|s| !s.trim().is_empty()) {
            Some(path) => PathBuf::from(path),
            None => default_settings_path().ok_or(ConfigError::NoSettingsPath)?,
        };

        let defaults = CompressionConfig::default();

        Ok(Self {
            api: ApiConfig {
                api_key: env::var("ANTHROPIC_API_KEY")
                    .map(|s| s.trim().to_string())
                    .unwrap_or_default(),
                base_url: env::var("ANTHROPIC_BASE_URL")
                    .map(|s| s.trim_end_matches('/').to_string())
                    .unwrap_or_else(|_| "https://api.anthropic.com/v1".to_string()),
                anthropic_version: env::var("ANTHROPIC_VERSION")
                    .unwrap_or_else(|_| "2023-06-01".to_string()),
                ocr_translation_model: env::var("OCR_TRANSLATION_MODEL")
                    .unwrap_or_else(|_| "claude-3-haiku-20240307".to_string()),
                max_tokens: env::var("MAX_TOKENS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(4000),
                temperature: env::var("TEMPERATURE")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(0.0),
                timeout: env::var("API_TIMEOUT_SECONDS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .map(Duration::from_secs),
            },
            compression: CompressionConfig {
                first_pass_quality: env::var("FIRST_PASS_QUALITY")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(defaults.first_pass_quality),
                second_pass_quality: env::var("SECOND_PASS_QUALITY")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(defaults.second_pass_quality),
                payload_ceiling_bytes: env::var("PAYLOAD_CEILING_BYTES")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(defaults.payload_ceiling_bytes),
            },
            settings: SettingsConfig {
                path: settings_path,
            },
            log_level,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        // API key is checked when the client is built, so onboarding works without one
        self.compression.validate()?;

        if self.api.max_tokens == 0 {
            return Err(ConfigError::InvalidApiConfig(
                "max_tokens must be > 0".to_string(),
            ));
        }

        if !(0.0..=1.0).contains(&self.api.temperature) {
            return Err(ConfigError::InvalidApiConfig(format!(
                "temperature must be between 0.0 and 1.0, got {}",
                self.api.temperature
            )));
        }

        if self.api.base_url.is_empty() {
            return Err(ConfigError::InvalidApiConfig(
                "base_url must not be empty".to_string(),
            ));
        }

        Ok(())
    }

    pub fn api_key(&self) -> &str {
        &self.api.api_key
    }

    pub fn ocr_translation_model(&self) -> &str {
        &self.api.ocr_translation_model
    }

    pub fn settings_path(&self) -> &PathBuf {
        &self.settings.path
    }

    pub fn log_level(&self) -> Level {
        self.log_level
    }
}

impl CompressionConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for quality in [self.first_pass_quality, self.second_pass_quality] {
            if !(quality > 0.0 && quality <= 1.0) {
                return Err(ConfigError::InvalidQuality(quality));
            }
        }

        if self.second_pass_quality > self.first_pass_quality {
            return Err(ConfigError::QualityOrder {
                first: self.first_pass_quality,
                second: self.second_pass_quality,
            });
        }

        if self.payload_ceiling_bytes == 0 {
            return Err(ConfigError::InvalidCeiling);
        }

        Ok(())
    }
}

fn default_settings_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "snap-translate").map(|dirs| dirs.data_dir().join("settings.json"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_compression_policy() {
        let compression = CompressionConfig::default();
        assert_eq!(compression.first_pass_quality, 0.65);
        assert_eq!(compression.second_pass_quality, 0.50);
        assert_eq!(compression.payload_ceiling_bytes, 5_242_880);
        assert!(compression.validate().is_ok());
    }

    #[test]
    fn test_rejects_out_of_range_quality() {
        let compression = CompressionConfig {
            first_pass_quality: 1.5,
            ..CompressionConfig::default()
        };
        assert!(matches!(
            compression.validate(),
            Err(ConfigError::InvalidQuality(q)) if q == 1.5
        ));

        let compression = CompressionConfig {
            second_pass_quality: 0.0,
            ..CompressionConfig::default()
        };
        assert!(matches!(
            compression.validate(),
            Err(ConfigError::InvalidQuality(_))
        ));
    }

    #[test]
    fn test_rejects_inverted_tiers_and_zero_ceiling() {
        let compression = CompressionConfig {
            first_pass_quality: 0.4,
            second_pass_quality: 0.6,
            ..CompressionConfig::default()
        };
        assert!(matches!(
            compression.validate(),
            Err(ConfigError::QualityOrder { .. })
        ));

        let compression = CompressionConfig {
            payload_ceiling_bytes: 0,
            ..CompressionConfig::default()
        };
        assert!(matches!(
            compression.validate(),
            Err(ConfigError::InvalidCeiling)
        ));
    }
}
