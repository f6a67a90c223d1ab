pub mod image_ops;
pub mod metrics;

// Re-export commonly used items
pub use image_ops::{decode_image, encode_jpeg, jpeg_quality, load_image_bytes_async};
pub use metrics::{Metrics, MetricsSnapshot};
