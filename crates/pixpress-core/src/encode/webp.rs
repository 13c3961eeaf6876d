//! WebP encoding.
//!
//! The `image` crate ships a lossless-only WebP encoder, so quality does not
//! change the output here. Alpha is preserved.

use image::codecs::webp::WebPEncoder;
use image::ImageEncoder;
use std::io::Cursor;

use super::{validate, EncodeError};
use crate::decode::DecodedImage;
use crate::format::OutputFormat;

/// Encode an image to lossless WebP bytes.
pub fn encode_webp(image: &DecodedImage, _quality: u8) -> Result<Vec<u8>, EncodeError> {
    validate(image)?;

    let mut buffer = Cursor::new(Vec::new());
    WebPEncoder::new_lossless(&mut buffer)
        .write_image(
            &image.pixels,
            image.width,
            image.height,
            image.layout.color_type(),
        )
        .map_err(|e| EncodeError::failed(OutputFormat::WebP, e))?;

    Ok(buffer.into_inner())
}
