//! Image encoding for the compression pipeline.
//!
//! One encode function per [`OutputFormat`] variant, all taking the same
//! quality scalar (1-100). How each container interprets quality is its own
//! business: the target-size search only looks at the output length.
//!
//! - JPEG: baseline encoder quality; alpha is dropped.
//! - PNG: lossless, maximum deflate effort; quality has no effect.
//! - WebP: lossless; quality has no effect.
//! - AVIF: encoder quality at a fixed speed.
//!
//! # Examples
//!
//! ```ignore
//! use pixpress_core::decode::DecodedImage;
//! use pixpress_core::encode::encode;
//! use pixpress_core::format::OutputFormat;
//!
//! let image = DecodedImage::new(100, 100, vec![128u8; 100 * 100 * 3]);
//! let jpeg_bytes = encode(&image, OutputFormat::Jpeg, 90).unwrap();
//! println!("Encoded {} bytes", jpeg_bytes.len());
//! ```

mod avif;
mod jpeg;
mod png;
mod webp;

pub use avif::{encode_avif, AVIF_SPEED};
pub use jpeg::encode_jpeg;
pub use png::encode_png;
pub use webp::encode_webp;

use thiserror::Error;

use crate::decode::DecodedImage;
use crate::format::OutputFormat;

/// Errors that can occur while resizing or encoding.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Pixel data length doesn't match expected dimensions
    #[error("Invalid pixel data: expected {expected} bytes, got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// The codec rejected the image
    #[error("{format} encoding failed: {message}")]
    EncodingFailed {
        format: OutputFormat,
        message: String,
    },
}

impl EncodeError {
    pub(crate) fn failed(format: OutputFormat, err: impl ToString) -> Self {
        EncodeError::EncodingFailed {
            format,
            message: err.to_string(),
        }
    }
}

/// Encode an image into `format` at `quality` (clamped to 1-100).
pub fn encode(
    image: &DecodedImage,
    format: OutputFormat,
    quality: u8,
) -> Result<Vec<u8>, EncodeError> {
    match format {
        OutputFormat::Jpeg => encode_jpeg(image, quality),
        OutputFormat::Png => encode_png(image, quality),
        OutputFormat::WebP => encode_webp(image, quality),
        OutputFormat::Avif => encode_avif(image, quality),
    }
}

/// Check dimensions and buffer length before handing pixels to a codec.
fn validate(image: &DecodedImage) -> Result<(), EncodeError> {
    if image.width == 0 || image.height == 0 {
        return Err(EncodeError::InvalidDimensions {
            width: image.width,
            height: image.height,
        });
    }

    let expected = image.width as usize * image.height as usize * image.layout.channels();
    if image.pixels.len() != expected {
        return Err(EncodeError::InvalidPixelData {
            expected,
            actual: image.pixels.len(),
        });
    }

    Ok(())
}
