//! JPEG encoding.
//!
//! Uses the `image` crate's baseline JPEG encoder. JPEG has no alpha channel,
//! so RGBA input is flattened by dropping alpha before encoding.

use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, ImageEncoder};
use std::io::Cursor;

use super::{validate, EncodeError};
use crate::decode::DecodedImage;
use crate::format::OutputFormat;

/// Encode an image to JPEG bytes.
///
/// # Quality Guidelines
///
/// * 90-100: High quality, suitable for archival or further editing
/// * 75-90: Good quality, recommended for most uses
/// * 60-75: Medium quality, acceptable for web/social media
/// * Below 60: Low quality, visible artifacts
///
/// Quality is clamped to 1-100.
pub fn encode_jpeg(image: &DecodedImage, quality: u8) -> Result<Vec<u8>, EncodeError> {
    validate(image)?;

    let quality = quality.clamp(1, 100);
    let mut buffer = Cursor::new(Vec::new());
    let encoder = JpegEncoder::new_with_quality(&mut buffer, quality);

    let result = if image.has_alpha() {
        let rgb = image.rgb_pixels();
        encoder.write_image(&rgb, image.width, image.height, ExtendedColorType::Rgb8)
    } else {
        encoder.write_image(&image.pixels, image.width, image.height, ExtendedColorType::Rgb8)
    };
    result.map_err(|e| EncodeError::failed(OutputFormat::Jpeg, e))?;

    Ok(buffer.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::test_images::*;

    fn gray(width: u32, height: u32) -> DecodedImage {
        DecodedImage::new(width, height, vec![128u8; (width * height * 3) as usize])
    }

    #[test]
    fn test_encode_jpeg_basic() {
        let jpeg_bytes = encode_jpeg(&gray(100, 100), 90).unwrap();

        // Check JPEG magic bytes (SOI marker)
        assert_eq!(&jpeg_bytes[0..2], &[0xFF, 0xD8]);

        // Check JPEG ends with EOI marker
        let len = jpeg_bytes.len();
        assert_eq!(&jpeg_bytes[len - 2..], &[0xFF, 0xD9]);
    }

    #[test]
    fn test_encode_jpeg_quality_affects_size() {
        let img = gradient(128, 128);

        let low_q = encode_jpeg(&img, 40).unwrap();
        let high_q = encode_jpeg(&img, 90).unwrap();

        assert!(high_q.len() > low_q.len());
    }

    #[test]
    fn test_encode_jpeg_quality_clamping() {
        let img = gray(10, 10);

        // Quality 0 should be clamped to 1
        assert!(encode_jpeg(&img, 0).is_ok());
        // Quality 255 should be clamped to 100
        assert!(encode_jpeg(&img, 255).is_ok());
    }

    #[test]
    fn test_encode_jpeg_drops_alpha() {
        let jpeg = encode_jpeg(&translucent(20, 10), 80).unwrap();
        assert_eq!(&jpeg[0..2], &[0xFF, 0xD8]);

        let decoded = crate::decode::decode_image(&jpeg).unwrap();
        assert!(!decoded.has_alpha());
        assert_eq!((decoded.width, decoded.height), (20, 10));
    }

    #[test]
    fn test_encode_jpeg_invalid_pixel_data_short() {
        let result = encode_jpeg(&mismatched(100, 100, 99 * 100 * 3), 90);
        assert!(matches!(result, Err(EncodeError::InvalidPixelData { .. })));
    }

    #[test]
    fn test_encode_jpeg_invalid_pixel_data_long() {
        let result = encode_jpeg(&mismatched(100, 100, 101 * 100 * 3), 90);
        assert!(matches!(result, Err(EncodeError::InvalidPixelData { .. })));
    }

    #[test]
    fn test_encode_jpeg_zero_width() {
        let result = encode_jpeg(&mismatched(0, 100, 0), 90);
        assert!(matches!(result, Err(EncodeError::InvalidDimensions { .. })));
    }

    #[test]
    fn test_encode_jpeg_small_image() {
        let img = DecodedImage::new(1, 1, vec![255, 0, 0]);
        let jpeg_bytes = encode_jpeg(&img, 90).unwrap();
        assert_eq!(&jpeg_bytes[0..2], &[0xFF, 0xD8]);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
