use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, instrument, warn};

use crate::core::config::ApiConfig;
use crate::core::errors::{ConfigError, TranslationError, TranslationResult};
use crate::utils::Metrics;

/// Messages API request body
#[derive(Debug, Clone, Serialize)]
pub struct MessagesRequest {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub messages: Vec<Message>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Message {
    pub role: String,
    pub content: Vec<ContentBlock>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Text { text: String },
    Image { source: ImageSource },
}

#[derive(Debug, Clone, Serialize)]
pub struct ImageSource {
    #[serde(rename = "type")]
    pub source_type: String,
    pub media_type: String,
    pub data: String,
}

impl ImageSource {
    pub fn jpeg_base64(data: String) -> Self {
        Self {
            source_type: "base64".to_string(),
            media_type: "image/jpeg".to_string(),
            data,
        }
    }
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ResponseBlock>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct ResponseBlock {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct Usage {
    #[serde(default)]
    input_tokens: u64,
    #[serde(default)]
    output_tokens: u64,
}

/// Sends one Messages request and returns the first content block's text.
#[async_trait]
pub trait VisionBackend: Send + Sync {
    async fn send(&self, request: &MessagesRequest) -> TranslationResult<String>;
}

/// Anthropic Messages API client
pub struct ApiClient {
    base_url: String,
    api_key: String,
    anthropic_version: String,
    http_client: reqwest::Client,
    metrics: Option<Metrics>,
}

impl ApiClient {
    pub fn new(config: &ApiConfig, metrics: Option<Metrics>) -> Result<Self> {
        if config.api_key.is_empty() {
            return Err(ConfigError::NoApiKey.into());
        }

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder.build().context("Failed to create HTTP client")?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            anthropic_version: config.anthropic_version.clone(),
            http_client,
            metrics,
        })
    }

    fn record(&self, success: bool, start: Instant, usage: Option<&Usage>) {
        if let Some(ref m) = self.metrics {
            let (input, output) = usage
                .map(|u| (u.input_tokens, u.output_tokens))
                .unwrap_or((0, 0));
            m.record_api_call(success, start.elapsed(), input, output);
        }
    }
}

#[async_trait]
impl VisionBackend for ApiClient {
    #[instrument(skip(self, request), fields(model = %request.model))]
    async fn send(&self, request: &MessagesRequest) -> TranslationResult<String> {
        let url = format!("{}/messages", self.base_url);
        let start = Instant::now();

        let response = match self
            .http_client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", &self.anthropic_version)
            .json(request)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!("Request to {} failed: {}", url, e);
                self.record(false, start, None);
                return Err(e.into());
            }
        };

        let status = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                self.record(false, start, None);
                return Err(e.into());
            }
        };

        if !status.is_success() {
            warn!("API error {}: {}", status, body);
            self.record(false, start, None);
            return Err(TranslationError::Api {
                status: status.as_u16(),
                message: extract_error_message(&body),
            });
        }

        let parsed: MessagesResponse = match serde_json::from_str(&body) {
            Ok(parsed) => parsed,
            Err(e) => {
                self.record(false, start, None);
                return Err(TranslationError::InvalidResponse(format!(
                    "Failed to parse API response: {}",
                    e
                )));
            }
        };

        self.record(true, start, parsed.usage.as_ref());
        debug!("API call succeeded in {:?}", start.elapsed());

        parsed
            .content
            .into_iter()
            .next()
            .and_then(|block| block.text)
            .ok_or_else(|| TranslationError::InvalidResponse("Missing text in API response".to_string()))
    }
}

/// Pull `error.message` out of an API error body, if there is one.
fn extract_error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value["error"]["message"]
        .as_str()
        .filter(|m| !m.is_empty())
        .map(str::to_string)
}
