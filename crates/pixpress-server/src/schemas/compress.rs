use pixpress_core::{CompressionOptions, CompressionResult, FieldValue, OutputFormat, PresetSize};
use poem_openapi::{
    payload::{Attachment, AttachmentType, Json},
    types::multipart::Upload,
    ApiResponse, Multipart, Object,
};

use super::common::ErrorResponse;

/// Multipart upload for `POST /compress`.
///
/// Every field besides `file` is optional text; which ones matter depends on
/// `mode`.
#[derive(Multipart)]
pub struct CompressForm {
    /// The image to compress
    pub file: Option<Upload>,

    /// preset, target or custom (default custom)
    pub mode: Option<String>,

    /// small, medium or large
    pub preset: Option<String>,

    /// auto, jpeg, png, webp or avif
    #[oai(rename = "outputFormat")]
    pub output_format: Option<String>,

    /// 1-100, custom mode only
    pub quality: Option<String>,

    /// Maximum width in pixels
    pub width: Option<String>,

    /// Maximum height in pixels
    pub height: Option<String>,

    /// Target size in kilobytes, target mode only
    #[oai(rename = "targetSizeKB")]
    pub target_size_kb: Option<String>,
}

impl CompressForm {
    /// Split off the upload and convert the text fields into options.
    pub fn into_parts(self) -> (Option<Upload>, CompressionOptions) {
        let options = CompressionOptions {
            mode: self.mode,
            preset: self.preset,
            output_format: self.output_format,
            quality: self.quality.map(FieldValue::from),
            width: self.width.map(FieldValue::from),
            height: self.height.map(FieldValue::from),
            target_size_kb: self.target_size_kb.map(FieldValue::from),
        };
        (self.file, options)
    }
}

#[derive(ApiResponse)]
#[oai(bad_request_handler = "bad_request_handler")]
pub enum CompressResponse {
    /// Compressed JPEG
    #[oai(status = 200, content_type = "image/jpeg")]
    Jpeg(
        Attachment<Vec<u8>>,
        #[oai(header = "X-Original-Size")] u64,
        #[oai(header = "X-Compressed-Size")] u64,
        #[oai(header = "X-Quality")] u8,
    ),

    /// Compressed PNG
    #[oai(status = 200, content_type = "image/png")]
    Png(
        Attachment<Vec<u8>>,
        #[oai(header = "X-Original-Size")] u64,
        #[oai(header = "X-Compressed-Size")] u64,
        #[oai(header = "X-Quality")] u8,
    ),

    /// Compressed WebP
    #[oai(status = 200, content_type = "image/webp")]
    Webp(
        Attachment<Vec<u8>>,
        #[oai(header = "X-Original-Size")] u64,
        #[oai(header = "X-Compressed-Size")] u64,
        #[oai(header = "X-Quality")] u8,
    ),

    /// Compressed AVIF
    #[oai(status = 200, content_type = "image/avif")]
    Avif(
        Attachment<Vec<u8>>,
        #[oai(header = "X-Original-Size")] u64,
        #[oai(header = "X-Compressed-Size")] u64,
        #[oai(header = "X-Quality")] u8,
    ),

    /// Missing file, invalid options, or an undecodable image
    #[oai(status = 400)]
    BadRequest(Json<ErrorResponse>),

    /// Upload larger than the configured limit
    #[oai(status = 413)]
    PayloadTooLarge(Json<ErrorResponse>),

    // Built by the `RateLimit` middleware, not the handler. Declared here so the
    // OpenAPI document lists the 429.
    /// Too many uploads from this client
    #[oai(status = 429)]
    TooManyRequests(Json<ErrorResponse>),

    /// Encoding failed
    #[oai(status = 500)]
    InternalServerError(Json<ErrorResponse>),
}

impl CompressResponse {
    /// Package a compression result as an inline download.
    pub fn image(result: CompressionResult, original_name: Option<&str>) -> Self {
        let file_name = result.file_name(original_name);
        let original_size = result.original_size as u64;
        let compressed_size = result.size() as u64;
        let quality = result.quality;
        let format = result.format;

        let body = Attachment::new(result.bytes)
            .attachment_type(AttachmentType::Inline)
            .filename(file_name);

        match format {
            OutputFormat::Jpeg => Self::Jpeg(body, original_size, compressed_size, quality),
            OutputFormat::Png => Self::Png(body, original_size, compressed_size, quality),
            OutputFormat::WebP => Self::Webp(body, original_size, compressed_size, quality),
            OutputFormat::Avif => Self::Avif(body, original_size, compressed_size, quality),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(Json(ErrorResponse::new(message)))
    }
}

fn bad_request_handler(err: poem::Error) -> CompressResponse {
    tracing::warn!("rejected malformed compress request: {}", err);
    CompressResponse::bad_request(err.to_string())
}

#[derive(Object, Debug, Clone)]
#[oai(rename_all = "camelCase")]
pub struct PresetInfo {
    pub name: String,
    /// Absent when the width is unconstrained
    pub max_width: Option<u32>,
    /// Absent when the height is unconstrained
    pub max_height: Option<u32>,
    pub quality: u8,
}

impl From<PresetSize> for PresetInfo {
    fn from(preset: PresetSize) -> Self {
        let settings = preset.settings();
        Self {
            name: preset.as_str().to_string(),
            max_width: settings.max_width,
            max_height: settings.max_height,
            quality: settings.quality,
        }
    }
}

#[derive(ApiResponse)]
pub enum PresetsResponse {
    #[oai(status = 200)]
    Ok(Json<Vec<PresetInfo>>),
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixpress_core::SourceFormat;

    fn result(format: OutputFormat) -> CompressionResult {
        CompressionResult {
            bytes: vec![1, 2, 3],
            format,
            source_format: SourceFormat::Png,
            quality: 75,
            width: 10,
            height: 10,
            original_size: 1000,
            attempts: 1,
            within_budget: true,
        }
    }

    #[test]
    fn test_form_into_options() {
        let form = CompressForm {
            file: None,
            mode: Some("target".to_string()),
            preset: None,
            output_format: Some("webp".to_string()),
            quality: Some("55".to_string()),
            width: None,
            height: Some("600".to_string()),
            target_size_kb: Some("250".to_string()),
        };

        let (file, options) = form.into_parts();
        assert!(file.is_none());
        assert_eq!(options.mode.as_deref(), Some("target"));
        assert_eq!(options.output_format.as_deref(), Some("webp"));
        assert_eq!(options.target_size_kb, Some(FieldValue::from("250")));
        assert_eq!(options.height, Some(FieldValue::from("600")));
        assert_eq!(options.width, None);
    }

    #[test]
    fn test_image_variant_follows_format() {
        assert!(matches!(
            CompressResponse::image(result(OutputFormat::Jpeg), None),
            CompressResponse::Jpeg(_, 1000, 3, 75)
        ));
        assert!(matches!(
            CompressResponse::image(result(OutputFormat::Png), None),
            CompressResponse::Png(..)
        ));
        assert!(matches!(
            CompressResponse::image(result(OutputFormat::WebP), None),
            CompressResponse::Webp(..)
        ));
        assert!(matches!(
            CompressResponse::image(result(OutputFormat::Avif), None),
            CompressResponse::Avif(..)
        ));
    }

    #[test]
    fn test_preset_info() {
        let info = PresetInfo::from(PresetSize::Small);
        assert_eq!(info.name, "small");
        assert_eq!(info.max_width, Some(1280));
        assert_eq!(info.max_height, None);
        assert_eq!(info.quality, 60);
    }
}
