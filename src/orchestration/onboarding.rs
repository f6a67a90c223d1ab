// First-run flow: pick a target language, grant camera access

use serde::Serialize;
use tracing::{info, warn};

use crate::core::errors::SettingsResult;
use crate::services::capture::ImageCapturer;
use crate::services::settings::Settings;

/// A target language offered during onboarding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SupportedLanguage {
    pub code: &'static str,
    pub name: &'static str,
}

pub const TARGET_LANGUAGES: [SupportedLanguage; 3] = [
    SupportedLanguage { code: "en", name: "English" },
    SupportedLanguage { code: "tr", name: "Türkçe" },
    SupportedLanguage { code: "fa", name: "فارسی" },
];

impl SupportedLanguage {
    /// Look up by code or display name, ignoring case.
    pub fn resolve(input: &str) -> Option<&'static SupportedLanguage> {
        let input = input.trim();
        TARGET_LANGUAGES.iter().find(|lang| {
            lang.code.eq_ignore_ascii_case(input) || lang.name.to_lowercase() == input.to_lowercase()
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OnboardingOutcome {
    Ready,
    /// Language is saved but the camera cannot be used yet
    PermissionDenied,
}

/// Where the app should start
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    GetStarted,
    Camera,
}

pub struct Onboarding {
    settings: Settings,
}

impl Onboarding {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    /// Persist the choice, mark onboarding complete, then ask for the camera.
    ///
    /// The language name (not the code) is stored, since it goes straight
    /// into the translation instruction.
    pub async fn select_language(
        &self,
        language: &SupportedLanguage,
        capturer: Option<&dyn ImageCapturer>,
    ) -> SettingsResult<OnboardingOutcome> {
        self.settings.set_target_language(language.name).await?;
        self.settings.mark_onboarding_complete().await?;
        info!("Target language set to {} ({})", language.name, language.code);

        if let Some(capturer) = capturer {
            if !capturer.request_permission().await.is_granted() {
                warn!("Camera permission not granted");
                return Ok(OnboardingOutcome::PermissionDenied);
            }
        }

        Ok(OnboardingOutcome::Ready)
    }

    pub async fn initial_route(&self) -> SettingsResult<Route> {
        if self.settings.onboarding_complete().await? {
            Ok(Route::Camera)
        } else {
            Ok(Route::GetStarted)
        }
    }
}
