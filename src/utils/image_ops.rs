use image::codecs::jpeg::JpegEncoder;
use image::DynamicImage;
use std::io::Cursor;
use std::path::Path;

use crate::core::errors::EncodingError;

/// Map a fractional quality in (0, 1] to the encoder's 1..=100 scale.
pub fn jpeg_quality(fraction: f32) -> u8 {
    (fraction * 100.0).round().clamp(1.0, 100.0) as u8
}

/// Decode any supported image format from memory.
pub fn decode_image(bytes: &[u8]) -> Result<DynamicImage, EncodingError> {
    Ok(image::load_from_memory(bytes)?)
}

/// Encode an image as baseline JPEG.
///
/// JPEG has no alpha channel, so the image is flattened to RGB first.
pub fn encode_jpeg(img: &DynamicImage, quality: f32) -> Result<Vec<u8>, EncodingError> {
    let rgb = img.to_rgb8();
    let mut jpeg_bytes = Vec::new();
    let mut cursor = Cursor::new(&mut jpeg_bytes);
    JpegEncoder::new_with_quality(&mut cursor, jpeg_quality(quality)).encode_image(&rgb)?;
    Ok(jpeg_bytes)
}

/// Read a captured image from disk without blocking the runtime.
pub async fn load_image_bytes_async(path: &Path) -> Result<Vec<u8>, EncodingError> {
    tokio::fs::read(path)
        .await
        .map_err(|source| EncodingError::ReadFailed {
            path: path.to_path_buf(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba, RgbaImage};

    #[test]
    fn test_jpeg_quality_mapping() {
        assert_eq!(jpeg_quality(0.65), 65);
        assert_eq!(jpeg_quality(0.50), 50);
        assert_eq!(jpeg_quality(1.0), 100);
        assert_eq!(jpeg_quality(0.0), 1);
    }

    #[test]
    fn test_encode_jpeg_flattens_alpha() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            32,
            32,
            Rgba([255, 0, 0, 128]),
        ));

        let jpeg = encode_jpeg(&img, 0.65).unwrap();
        assert!(!jpeg.is_empty());
        assert_eq!(image::guess_format(&jpeg).unwrap(), ImageFormat::Jpeg);

        let decoded = decode_image(&jpeg).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (32, 32));
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let result = decode_image(b"definitely not an image");
        assert!(matches!(result, Err(EncodingError::DecodeFailed(_))));
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let result = load_image_bytes_async(Path::new("/nonexistent/photo.jpg")).await;
        assert!(matches!(result, Err(EncodingError::ReadFailed { .. })));
    }
}
