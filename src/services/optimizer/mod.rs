// Two-tier JPEG recompression to keep the inline payload under the API ceiling

use base64::{engine::general_purpose, Engine};
use std::sync::Arc;
use tracing::{debug, instrument};

use crate::core::config::CompressionConfig;
use crate::core::errors::EncodingError;
use crate::core::types::{approx_decoded_len, CaptureResult, CompressionPass, OptimizedImage};
use crate::utils::image_ops::{decode_image, encode_jpeg, load_image_bytes_async};
use crate::utils::Metrics;

/// Re-encodes image bytes as JPEG at a fractional quality.
pub trait PayloadEncoder: Send + Sync {
    fn encode(&self, source: &[u8], quality: f32) -> Result<Vec<u8>, EncodingError>;
}

/// Encoder backed by the `image` crate
#[derive(Debug, Default, Clone, Copy)]
pub struct ImageCrateEncoder;

impl PayloadEncoder for ImageCrateEncoder {
    fn encode(&self, source: &[u8], quality: f32) -> Result<Vec<u8>, EncodingError> {
        let img = decode_image(source)?;
        encode_jpeg(&img, quality)
    }
}

pub struct ImageOptimizer {
    policy: CompressionConfig,
    encoder: Arc<dyn PayloadEncoder>,
    metrics: Option<Metrics>,
}

impl ImageOptimizer {
    pub fn new(policy: CompressionConfig) -> Self {
        Self::with_encoder(policy, Arc::new(ImageCrateEncoder))
    }

    pub fn with_encoder(policy: CompressionConfig, encoder: Arc<dyn PayloadEncoder>) -> Self {
        Self {
            policy,
            encoder,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Metrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn policy(&self) -> &CompressionConfig {
        &self.policy
    }

    /// Read the captured image and produce the base64 payload.
    ///
    /// Encoding is CPU-bound, so it runs on the blocking pool.
    #[instrument(skip(self, capture), fields(path = %capture.image_path.display()))]
    pub async fn optimize(&self, capture: &CaptureResult) -> Result<OptimizedImage, EncodingError> {
        let source = load_image_bytes_async(&capture.image_path).await?;

        let encoder = Arc::clone(&self.encoder);
        let policy = self.policy.clone();
        let optimized = tokio::task::spawn_blocking(move || {
            optimize_bytes(encoder.as_ref(), &policy, &source)
        })
        .await
        .map_err(|e| EncodingError::TaskJoinFailed(e.to_string()))??;

        if let Some(ref m) = self.metrics {
            m.record_payload(optimized.pass, optimized.approx_bytes());
        }

        Ok(optimized)
    }
}

/// Fixed two-tier policy: encode at the first quality; if the payload is over
/// the ceiling, re-encode that output once at the second quality and keep it
/// whatever its size.
pub fn optimize_bytes(
    encoder: &dyn PayloadEncoder,
    policy: &CompressionConfig,
    source: &[u8],
) -> Result<OptimizedImage, EncodingError> {
    let first = encode_tier(encoder, source, policy.first_pass_quality)?;
    let first_base64 = general_purpose::STANDARD.encode(&first);
    debug!(
        "Image size: {:.1} KB (quality {})",
        approx_decoded_len(&first_base64) as f64 / 1024.0,
        policy.first_pass_quality
    );

    if !exceeds_ceiling(&first_base64, policy.payload_ceiling_bytes) {
        return Ok(OptimizedImage {
            base64: first_base64,
            quality: policy.first_pass_quality,
            pass: CompressionPass::First,
        });
    }

    let second = encode_tier(encoder, &first, policy.second_pass_quality)?;
    let second_base64 = general_purpose::STANDARD.encode(&second);
    debug!(
        "Further compressed size: {:.1} KB (quality {})",
        approx_decoded_len(&second_base64) as f64 / 1024.0,
        policy.second_pass_quality
    );

    Ok(OptimizedImage {
        base64: second_base64,
        quality: policy.second_pass_quality,
        pass: CompressionPass::Second,
    })
}

fn encode_tier(
    encoder: &dyn PayloadEncoder,
    source: &[u8],
    quality: f32,
) -> Result<Vec<u8>, EncodingError> {
    let bytes = encoder.encode(source, quality)?;
    if bytes.is_empty() {
        return Err(EncodingError::EmptyPayload { quality });
    }
    Ok(bytes)
}

fn exceeds_ceiling(base64: &str, ceiling: usize) -> bool {
    base64.len() as f64 * 0.75 > ceiling as f64
}
