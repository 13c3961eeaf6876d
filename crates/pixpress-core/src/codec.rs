//! The codec seam of the compression pipeline.
//!
//! [`Compressor`](crate::Compressor) never calls an encoder directly; it goes
//! through a [`Codec`] handed to it at construction. Production code uses
//! [`ImageCodec`]; tests substitute fakes that count calls or fabricate sizes.

use crate::decode::DecodedImage;
use crate::encode::{self, EncodeError};
use crate::format::OutputFormat;

/// Encodes a pixel buffer into a container at a quality level.
pub trait Codec {
    fn encode(
        &self,
        image: &DecodedImage,
        format: OutputFormat,
        quality: u8,
    ) -> Result<Vec<u8>, EncodeError>;
}

impl<C: Codec + ?Sized> Codec for &C {
    fn encode(
        &self,
        image: &DecodedImage,
        format: OutputFormat,
        quality: u8,
    ) -> Result<Vec<u8>, EncodeError> {
        (**self).encode(image, format, quality)
    }
}

/// Codec backed by the `image` crate encoders in [`crate::encode`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageCodec;

impl Codec for ImageCodec {
    fn encode(
        &self,
        image: &DecodedImage,
        format: OutputFormat,
        quality: u8,
    ) -> Result<Vec<u8>, EncodeError> {
        encode::encode(image, format, quality)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_codec_matches_encode() {
        let img = DecodedImage::new(8, 8, vec![90u8; 8 * 8 * 3]);
        let via_codec = ImageCodec.encode(&img, OutputFormat::Jpeg, 70).unwrap();
        let direct = encode::encode_jpeg(&img, 70).unwrap();
        assert_eq!(via_codec, direct);
    }

    #[test]
    fn test_codec_by_reference() {
        fn encode_with<C: Codec>(codec: C, img: &DecodedImage) -> usize {
            codec.encode(img, OutputFormat::Png, 80).unwrap().len()
        }

        let img = DecodedImage::new(4, 4, vec![0u8; 4 * 4 * 3]);
        let codec = ImageCodec;
        assert!(encode_with(&codec, &img) > 0);
    }
}
