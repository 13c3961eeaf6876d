//! The compression pipeline.
//!
//! decode -> resolve output format -> resize once -> encode (once, or via the
//! target-size search). Each call is independent and keeps no state; a single
//! [`Compressor`] can be shared across threads when its codec can.

use thiserror::Error;
use tracing::debug;

use crate::codec::{Codec, ImageCodec};
use crate::decode::{decode_image, DecodeError, FilterType};
use crate::encode::EncodeError;
use crate::format::{detect_format, resolve_output_format, OutputFormat, SourceFormat};
use crate::request::{CompressionMode, CompressionRequest};
use crate::resize::fit_inside;
use crate::search::search_quality;

/// Failure of a whole compression call. No partial output exists.
#[derive(Debug, Error)]
pub enum CompressError {
    /// The input could not be decoded; the caller sent a bad file.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// Resizing or encoding failed on valid input.
    #[error(transparent)]
    Encode(#[from] EncodeError),
}

impl CompressError {
    /// True when the failure is the caller's input rather than processing.
    pub fn is_client_error(&self) -> bool {
        matches!(self, CompressError::Decode(_))
    }
}

/// The encoded output of one compression call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressionResult {
    pub bytes: Vec<u8>,
    pub format: OutputFormat,
    pub source_format: SourceFormat,
    /// Quality of the final encode.
    pub quality: u8,
    pub width: u32,
    pub height: u32,
    /// Size of the input in bytes.
    pub original_size: usize,
    /// Encode calls made; always 1 outside target mode.
    pub attempts: u32,
    /// False only for a target search that ended over budget.
    pub within_budget: bool,
}

impl CompressionResult {
    pub fn content_type(&self) -> &'static str {
        self.format.content_type()
    }

    pub fn extension(&self) -> &'static str {
        self.format.extension()
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    /// Download name derived from the uploaded name with the resolved
    /// extension, e.g. `holiday.png` -> `holiday-compressed.jpg`.
    pub fn file_name(&self, original: Option<&str>) -> String {
        output_file_name(original, self.format)
    }
}

/// Build `<stem>-compressed.<ext>`, falling back to `image` for the stem.
pub fn output_file_name(original: Option<&str>, format: OutputFormat) -> String {
    let stem = original
        .map(|name| name.rsplit(|c: char| c == '/' || c == '\\').next().unwrap_or(name))
        .map(|name| match name.rfind('.') {
            Some(idx) if idx > 0 => &name[..idx],
            _ => name,
        })
        .map(|stem| {
            stem.chars()
                .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | ' '))
                .collect::<String>()
        })
        .map(|stem| stem.trim().trim_matches('.').to_string())
        .filter(|stem| !stem.is_empty())
        .unwrap_or_else(|| "image".to_string());

    format!("{}-compressed.{}", stem, format.extension())
}

/// Runs compression requests through an injected [`Codec`].
#[derive(Debug, Clone, Default)]
pub struct Compressor<C = ImageCodec> {
    codec: C,
    filter: FilterType,
}

impl Compressor<ImageCodec> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<C: Codec> Compressor<C> {
    pub fn with_codec(codec: C) -> Self {
        Self {
            codec,
            filter: FilterType::default(),
        }
    }

    /// Override the resize interpolation (Lanczos3 by default).
    pub fn with_filter(mut self, filter: FilterType) -> Self {
        self.filter = filter;
        self
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }

    /// Compress `input` according to `request`.
    ///
    /// # Errors
    ///
    /// `CompressError::Decode` when the input is not a decodable image,
    /// `CompressError::Encode` when resizing or encoding fails. A target
    /// search that cannot reach its budget is not an error.
    pub fn compress(
        &self,
        input: &[u8],
        request: &CompressionRequest,
    ) -> Result<CompressionResult, CompressError> {
        let source_format = detect_format(input);
        let decoded = decode_image(input)?;
        let format = resolve_output_format(source_format, request.output_format);

        let bounds = request.resize_box();
        let image = if bounds.is_constrained() {
            fit_inside(&decoded, bounds, self.filter)?
        } else {
            decoded
        };

        debug!(
            mode = request.mode.name(),
            %source_format,
            %format,
            width = image.width,
            height = image.height,
            "compressing image"
        );

        let (bytes, quality, attempts, within_budget) = match request.mode {
            CompressionMode::Target { target_bytes } => {
                let outcome = search_quality(&self.codec, &image, format, target_bytes)?;
                (
                    outcome.bytes,
                    outcome.quality,
                    outcome.attempts,
                    outcome.within_budget,
                )
            }
            CompressionMode::Preset(preset) => {
                let quality = preset.settings().quality;
                (self.codec.encode(&image, format, quality)?, quality, 1, true)
            }
            CompressionMode::Custom { quality } => {
                (self.codec.encode(&image, format, quality)?, quality, 1, true)
            }
        };

        Ok(CompressionResult {
            bytes,
            format,
            source_format,
            quality,
            width: image.width,
            height: image.height,
            original_size: input.len(),
            attempts,
            within_budget,
        })
    }
}
