pub mod onboarding;
pub mod pipeline;

pub use onboarding::{Onboarding, OnboardingOutcome, Route, SupportedLanguage, TARGET_LANGUAGES};
pub use pipeline::ScanPipeline;
