//! Compression requests.
//!
//! [`CompressionRequest`] is the typed form the pipeline consumes: the mode is
//! a closed enum carrying only its own settings. [`CompressionOptions`] is the
//! loose form callers submit (multipart fields, a JavaScript object); parsing
//! it looks only at the fields the selected mode uses, so stray values for
//! other modes are ignored rather than rejected.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::format::RequestedFormat;
use crate::preset::{PresetSize, UnknownPreset};
use crate::resize::ResizeBox;

/// Quality used by custom mode when none is given.
pub const DEFAULT_QUALITY: u8 = 80;

/// Kilobytes are binary: `targetSizeKB` is multiplied by this.
pub const BYTES_PER_KB: f64 = 1024.0;

/// Which behaviour drives a compression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionMode {
    /// Fixed resize box and quality from the preset table.
    Preset(PresetSize),
    /// Search qualities 90 down to 40 for output at or under `target_bytes`.
    Target { target_bytes: u64 },
    /// Encode once at the given quality.
    Custom { quality: u8 },
}

impl CompressionMode {
    pub fn name(&self) -> &'static str {
        match self {
            CompressionMode::Preset(_) => "preset",
            CompressionMode::Target { .. } => "target",
            CompressionMode::Custom { .. } => "custom",
        }
    }
}

/// A fully parsed compression request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressionRequest {
    pub mode: CompressionMode,
    /// User-supplied box. Ignored in preset mode.
    pub resize: ResizeBox,
    pub output_format: RequestedFormat,
}

impl CompressionRequest {
    pub fn preset(preset: PresetSize) -> Self {
        Self::with_mode(CompressionMode::Preset(preset))
    }

    pub fn target(target_bytes: u64) -> Self {
        Self::with_mode(CompressionMode::Target { target_bytes })
    }

    pub fn custom(quality: u8) -> Self {
        Self::with_mode(CompressionMode::Custom {
            quality: quality.clamp(1, 100),
        })
    }

    fn with_mode(mode: CompressionMode) -> Self {
        Self {
            mode,
            resize: ResizeBox::unbounded(),
            output_format: RequestedFormat::Auto,
        }
    }

    pub fn with_resize(mut self, max_width: Option<u32>, max_height: Option<u32>) -> Self {
        self.resize = ResizeBox::new(max_width, max_height);
        self
    }

    pub fn with_output_format(mut self, format: RequestedFormat) -> Self {
        self.output_format = format;
        self
    }

    /// The box the resize stage uses: the preset's in preset mode, otherwise
    /// the caller's.
    pub fn resize_box(&self) -> ResizeBox {
        match self.mode {
            CompressionMode::Preset(preset) => preset.settings().resize_box(),
            _ => self.resize,
        }
    }
}

/// Errors from parsing [`CompressionOptions`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OptionsError {
    #[error("Invalid compression mode: {0}")]
    UnknownMode(String),

    #[error("A preset is required when mode is preset")]
    MissingPreset,

    #[error(transparent)]
    UnknownPreset(#[from] UnknownPreset),

    #[error("targetSizeKB is required when mode is target")]
    MissingTargetSize,

    #[error("Invalid target size: {0}")]
    InvalidTargetSize(String),
}

/// A numeric field that may arrive as a number or as text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Text(String),
}

impl FieldValue {
    /// The numeric value, if any. Blank or unparsable text is `None`.
    pub fn as_f64(&self) -> Option<f64> {
        let value = match self {
            FieldValue::Number(n) => *n,
            FieldValue::Text(text) => text.trim().parse().ok()?,
        };
        value.is_finite().then_some(value)
    }

    fn display(&self) -> String {
        match self {
            FieldValue::Number(n) => n.to_string(),
            FieldValue::Text(text) => text.clone(),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<u32> for FieldValue {
    fn from(value: u32) -> Self {
        FieldValue::Number(value as f64)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

/// Loosely typed request fields as submitted by a form or script.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompressionOptions {
    pub mode: Option<String>,
    pub preset: Option<String>,
    pub output_format: Option<String>,
    pub quality: Option<FieldValue>,
    pub width: Option<FieldValue>,
    pub height: Option<FieldValue>,
    #[serde(rename = "targetSizeKB")]
    pub target_size_kb: Option<FieldValue>,
}

impl CompressionOptions {
    /// Parse into a typed request.
    ///
    /// - A missing or blank `mode` means `custom`.
    /// - `quality` defaults to 80 when missing or unparsable, and is clamped
    ///   to 1-100.
    /// - `width`/`height` that are missing, unparsable, or not positive leave
    ///   that axis unconstrained.
    /// - `targetSizeKB` must be a positive number; it may be fractional.
    /// - Unrecognized `outputFormat` values behave like `auto`.
    pub fn into_request(self) -> Result<CompressionRequest, OptionsError> {
        let output_format = self
            .output_format
            .as_deref()
            .map(RequestedFormat::parse)
            .unwrap_or_default();

        let mode_name = self
            .mode
            .as_deref()
            .map(|m| m.trim().to_ascii_lowercase())
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| "custom".to_string());

        let request = match mode_name.as_str() {
            "preset" => {
                let preset = self
                    .preset
                    .as_deref()
                    .filter(|p| !p.trim().is_empty())
                    .ok_or(OptionsError::MissingPreset)?
                    .parse::<PresetSize>()?;
                CompressionRequest::preset(preset)
            }
            "target" => {
                let raw = self
                    .target_size_kb
                    .as_ref()
                    .ok_or(OptionsError::MissingTargetSize)?;
                let kb = raw
                    .as_f64()
                    .filter(|kb| *kb > 0.0)
                    .ok_or_else(|| OptionsError::InvalidTargetSize(raw.display()))?;
                let target_bytes = ((kb * BYTES_PER_KB).round() as u64).max(1);
                CompressionRequest::target(target_bytes)
                    .with_resize(dimension(&self.width), dimension(&self.height))
            }
            "custom" => {
                let quality = self
                    .quality
                    .as_ref()
                    .and_then(FieldValue::as_f64)
                    .map(|q| q.round().clamp(1.0, 100.0) as u8)
                    .unwrap_or(DEFAULT_QUALITY);
                CompressionRequest::custom(quality)
                    .with_resize(dimension(&self.width), dimension(&self.height))
            }
            other => return Err(OptionsError::UnknownMode(other.to_string())),
        };

        Ok(request.with_output_format(output_format))
    }
}

fn dimension(value: &Option<FieldValue>) -> Option<u32> {
    value
        .as_ref()
        .and_then(FieldValue::as_f64)
        .map(f64::round)
        .filter(|v| *v >= 1.0)
        .map(|v| v.min(u32::MAX as f64) as u32)
}
