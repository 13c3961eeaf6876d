//! AVIF encoding through the `image` crate's rav1e-backed encoder.

use image::codecs::avif::AvifEncoder;
use image::ImageEncoder;
use std::io::Cursor;

use super::{validate, EncodeError};
use crate::decode::DecodedImage;
use crate::format::OutputFormat;

/// Encoder speed (1 = slowest/smallest, 10 = fastest).
pub const AVIF_SPEED: u8 = 6;

/// Encode an image to AVIF bytes. Quality is clamped to 1-100.
pub fn encode_avif(image: &DecodedImage, quality: u8) -> Result<Vec<u8>, EncodeError> {
    validate(image)?;

    let quality = quality.clamp(1, 100);
    let mut buffer = Cursor::new(Vec::new());
    AvifEncoder::new_with_speed_quality(&mut buffer, AVIF_SPEED, quality)
        .write_image(
            &image.pixels,
            image.width,
            image.height,
            image.layout.color_type(),
        )
        .map_err(|e| EncodeError::failed(OutputFormat::Avif, e))?;

    Ok(buffer.into_inner())
}
