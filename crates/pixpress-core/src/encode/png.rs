//! PNG encoding.
//!
//! PNG is lossless, so the quality scalar is accepted for a uniform codec
//! signature but does not influence the output. Alpha is preserved.

use image::codecs::png::{CompressionType, FilterType as PngFilterType, PngEncoder};
use image::ImageEncoder;
use std::io::Cursor;

use super::{validate, EncodeError};
use crate::decode::DecodedImage;
use crate::format::OutputFormat;

/// Encode an image to PNG bytes with maximum compression effort.
pub fn encode_png(image: &DecodedImage, _quality: u8) -> Result<Vec<u8>, EncodeError> {
    validate(image)?;

    let mut buffer = Cursor::new(Vec::new());
    PngEncoder::new_with_quality(&mut buffer, CompressionType::Best, PngFilterType::Adaptive)
        .write_image(
            &image.pixels,
            image.width,
            image.height,
            image.layout.color_type(),
        )
        .map_err(|e| EncodeError::failed(OutputFormat::Png, e))?;

    Ok(buffer.into_inner())
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: Same buffer and quality always produce the same bytes.
        #[test]
        fn prop_deterministic_output(
            (width, height) in (1u32..=24, 1u32..=24),
            quality in 1u8..=100,
            seed in any::<u8>(),
        ) {
            let pixels = (0..width * height * 3)
                .map(|i| (i as u8).wrapping_mul(17).wrapping_add(seed))
                .collect();
            let img = DecodedImage::new(width, height, pixels);

            let first = encode_png(&img, quality).unwrap();
            let second = encode_png(&img, quality).unwrap();
            prop_assert_eq!(first, second);
        }
    }
}
