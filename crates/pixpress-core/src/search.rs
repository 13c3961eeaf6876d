//! Target-size quality search.
//!
//! Starting at quality 90 the image is re-encoded in steps of 5 until the
//! output fits the byte budget. Once the next step would reach the floor of
//! 40, one final encode at 40 is returned whether it fits or not. The search
//! is a plain linear walk: every attempt is a fresh full encode of the same
//! resized buffer, and at most 11 encodes happen (90, 85, ..., 45, 40).
//!
//! Ending over budget is a successful outcome with
//! [`SearchOutcome::within_budget`] set to false, never an error.

use tracing::{debug, warn};

use crate::codec::Codec;
use crate::decode::DecodedImage;
use crate::encode::EncodeError;
use crate::format::OutputFormat;

/// First quality tried.
pub const SEARCH_START_QUALITY: u8 = 90;
/// Quality decrement between attempts.
pub const SEARCH_QUALITY_STEP: u8 = 5;
/// Quality at which the search stops and accepts the result.
pub const SEARCH_FLOOR_QUALITY: u8 = 40;
/// Worst-case encode calls: (90 - 40) / 5 + 1.
pub const MAX_SEARCH_ATTEMPTS: u32 =
    ((SEARCH_START_QUALITY - SEARCH_FLOOR_QUALITY) / SEARCH_QUALITY_STEP) as u32 + 1;

/// The buffer a search settled on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOutcome {
    pub bytes: Vec<u8>,
    /// Quality the returned bytes were encoded at.
    pub quality: u8,
    /// Number of encode calls made.
    pub attempts: u32,
    /// False only when the floor result still exceeds the budget.
    pub within_budget: bool,
}

/// Find the highest quality on the 90, 85, ..., 40 ladder whose output fits
/// `target_bytes`, falling back to the floor encode.
pub fn search_quality<C: Codec + ?Sized>(
    codec: &C,
    image: &DecodedImage,
    format: OutputFormat,
    target_bytes: u64,
) -> Result<SearchOutcome, EncodeError> {
    let mut quality = SEARCH_START_QUALITY;
    let mut attempts = 0;

    loop {
        let bytes = codec.encode(image, format, quality)?;
        attempts += 1;

        let size = bytes.len() as u64;
        debug!(%format, quality, size, target_bytes, attempts, "target search attempt");

        if size <= target_bytes {
            return Ok(SearchOutcome {
                bytes,
                quality,
                attempts,
                within_budget: true,
            });
        }

        if quality <= SEARCH_FLOOR_QUALITY {
            warn!(
                %format,
                size,
                target_bytes,
                "target size not reached at quality floor, returning best effort"
            );
            return Ok(SearchOutcome {
                bytes,
                quality,
                attempts,
                within_budget: false,
            });
        }

        quality = quality
            .saturating_sub(SEARCH_QUALITY_STEP)
            .max(SEARCH_FLOOR_QUALITY);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::ImageCodec;
    use std::cell::RefCell;

    /// Fake codec whose output length is `quality * bytes_per_quality`.
    struct SizedCodec {
        bytes_per_quality: usize,
        calls: RefCell<Vec<u8>>,
    }

    impl SizedCodec {
        fn new(bytes_per_quality: usize) -> Self {
            Self {
                bytes_per_quality,
                calls: RefCell::new(Vec::new()),
            }
        }

        fn qualities(&self) -> Vec<u8> {
            self.calls.borrow().clone()
        }
    }

    impl Codec for SizedCodec {
        fn encode(
            &self,
            _image: &DecodedImage,
            _format: OutputFormat,
            quality: u8,
        ) -> Result<Vec<u8>, EncodeError> {
            self.calls.borrow_mut().push(quality);
            Ok(vec![0u8; quality as usize * self.bytes_per_quality])
        }
    }

    struct FailingCodec;

    impl Codec for FailingCodec {
        fn encode(&self, _: &DecodedImage, format: OutputFormat, _: u8) -> Result<Vec<u8>, EncodeError> {
            Err(EncodeError::failed(format, "codec exploded"))
        }
    }

    fn image() -> DecodedImage {
        DecodedImage::new(4, 4, vec![0u8; 4 * 4 * 3])
    }

    #[test]
    fn test_max_attempts_constant() {
        assert_eq!(MAX_SEARCH_ATTEMPTS, 11);
    }

    #[test]
    fn test_first_attempt_fits() {
        let codec = SizedCodec::new(100);
        let outcome = search_quality(&codec, &image(), OutputFormat::Jpeg, 500 * 1024).unwrap();

        assert_eq!(codec.qualities(), vec![90]);
        assert_eq!(outcome.attempts, 1);
        assert_eq!(outcome.quality, 90);
        assert!(outcome.within_budget);
        assert_eq!(outcome.bytes.len(), 9000);
    }

    #[test]
    fn test_steps_down_until_fit() {
        let codec = SizedCodec::new(100);
        let outcome = search_quality(&codec, &image(), OutputFormat::Jpeg, 6000).unwrap();

        assert_eq!(codec.qualities(), vec![90, 85, 80, 75, 70, 65, 60]);
        assert_eq!(outcome.quality, 60);
        assert_eq!(outcome.attempts, 7);
        assert!(outcome.within_budget);
    }

    #[test]
    fn test_exact_budget_counts_as_fit() {
        let codec = SizedCodec::new(10);
        let outcome = search_quality(&codec, &image(), OutputFormat::WebP, 850).unwrap();
        assert_eq!(outcome.quality, 85);
        assert!(outcome.within_budget);
    }

    #[test]
    fn test_floor_result_returned_over_budget() {
        let codec = SizedCodec::new(100);
        let outcome = search_quality(&codec, &image(), OutputFormat::Avif, 1).unwrap();

        assert_eq!(
            codec.qualities(),
            vec![90, 85, 80, 75, 70, 65, 60, 55, 50, 45, 40]
        );
        assert_eq!(outcome.attempts, MAX_SEARCH_ATTEMPTS);
        assert_eq!(outcome.quality, SEARCH_FLOOR_QUALITY);
        assert_eq!(outcome.bytes.len(), 4000);
        assert!(!outcome.within_budget);
    }

    #[test]
    fn test_fits_exactly_at_floor() {
        let codec = SizedCodec::new(100);
        let outcome = search_quality(&codec, &image(), OutputFormat::Jpeg, 4000).unwrap();
        assert_eq!(outcome.attempts, 11);
        assert!(outcome.within_budget);
    }

    #[test]
    fn test_codec_error_propagates() {
        let result = search_quality(&FailingCodec, &image(), OutputFormat::Png, 10);
        assert!(matches!(result, Err(EncodeError::EncodingFailed { .. })));
    }

    #[test]
    fn test_real_jpeg_unreachable_budget() {
        let img = crate::encode::test_images::gradient(32, 32);
        let outcome = search_quality(&ImageCodec, &img, OutputFormat::Jpeg, 1).unwrap();

        assert_eq!(outcome.attempts, 11);
        assert_eq!(outcome.quality, 40);
        assert!(!outcome.within_budget);
        assert_eq!(&outcome.bytes[0..2], &[0xFF, 0xD8]);
    }
}
