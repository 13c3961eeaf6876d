//! Output format negotiation.
//!
//! A request names the container it wants (`auto`, `jpeg`, `png`, `webp`,
//! `avif`); the resolver turns that plus the detected source format into a
//! single concrete [`OutputFormat`]. Resolution never fails: `auto` and
//! anything unrecognized fall back to PNG for PNG sources and JPEG otherwise.

use std::fmt;
use std::str::FromStr;

use image::ImageFormat;
use serde::{Deserialize, Serialize};

/// Container detected from the input bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    Jpeg,
    Png,
    Gif,
    WebP,
    Tiff,
    Bmp,
    Avif,
    Unknown,
}

impl SourceFormat {
    /// Lowercase name, e.g. `"png"` or `"unknown"`.
    pub fn as_str(self) -> &'static str {
        match self {
            SourceFormat::Jpeg => "jpeg",
            SourceFormat::Png => "png",
            SourceFormat::Gif => "gif",
            SourceFormat::WebP => "webp",
            SourceFormat::Tiff => "tiff",
            SourceFormat::Bmp => "bmp",
            SourceFormat::Avif => "avif",
            SourceFormat::Unknown => "unknown",
        }
    }

    /// Parse a detected-format name. Anything unrecognized is `Unknown`.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "jpeg" | "jpg" => SourceFormat::Jpeg,
            "png" => SourceFormat::Png,
            "gif" => SourceFormat::Gif,
            "webp" => SourceFormat::WebP,
            "tiff" | "tif" => SourceFormat::Tiff,
            "bmp" => SourceFormat::Bmp,
            "avif" => SourceFormat::Avif,
            _ => SourceFormat::Unknown,
        }
    }
}

impl From<ImageFormat> for SourceFormat {
    fn from(format: ImageFormat) -> Self {
        match format {
            ImageFormat::Jpeg => SourceFormat::Jpeg,
            ImageFormat::Png => SourceFormat::Png,
            ImageFormat::Gif => SourceFormat::Gif,
            ImageFormat::WebP => SourceFormat::WebP,
            ImageFormat::Tiff => SourceFormat::Tiff,
            ImageFormat::Bmp => SourceFormat::Bmp,
            ImageFormat::Avif => SourceFormat::Avif,
            _ => SourceFormat::Unknown,
        }
    }
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sniff the container from magic bytes. Never fails.
pub fn detect_format(bytes: &[u8]) -> SourceFormat {
    image::guess_format(bytes)
        .map(SourceFormat::from)
        .unwrap_or(SourceFormat::Unknown)
}

/// A concrete output container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Jpeg,
    Png,
    WebP,
    Avif,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 4] = [
        OutputFormat::Jpeg,
        OutputFormat::Png,
        OutputFormat::WebP,
        OutputFormat::Avif,
    ];

    /// MIME type for the `Content-Type` header.
    pub fn content_type(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "image/jpeg",
            OutputFormat::Png => "image/png",
            OutputFormat::WebP => "image/webp",
            OutputFormat::Avif => "image/avif",
        }
    }

    /// File extension without the dot. JPEG uses `jpg`.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "jpg",
            OutputFormat::Png => "png",
            OutputFormat::WebP => "webp",
            OutputFormat::Avif => "avif",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "jpeg",
            OutputFormat::Png => "png",
            OutputFormat::WebP => "webp",
            OutputFormat::Avif => "avif",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The output container a caller asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestedFormat {
    /// Derive from the source: PNG stays PNG, everything else becomes JPEG.
    #[default]
    Auto,
    Exact(OutputFormat),
}

impl RequestedFormat {
    /// Parse a requested format. Unrecognized values behave like `auto`.
    pub fn parse(value: &str) -> Self {
        value.parse().unwrap_or_default()
    }
}

impl FromStr for RequestedFormat {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "auto" => Ok(RequestedFormat::Auto),
            "jpeg" | "jpg" => Ok(RequestedFormat::Exact(OutputFormat::Jpeg)),
            "png" => Ok(RequestedFormat::Exact(OutputFormat::Png)),
            "webp" => Ok(RequestedFormat::Exact(OutputFormat::WebP)),
            "avif" => Ok(RequestedFormat::Exact(OutputFormat::Avif)),
            other => Err(UnknownFormat(other.to_string())),
        }
    }
}

/// A format name that is not one of the supported outputs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown output format: {0}")]
pub struct UnknownFormat(pub String);

/// Resolve the concrete output container for a request.
pub fn resolve_output_format(source: SourceFormat, requested: RequestedFormat) -> OutputFormat {
    match requested {
        RequestedFormat::Exact(format) => format,
        RequestedFormat::Auto if source == SourceFormat::Png => OutputFormat::Png,
        RequestedFormat::Auto => OutputFormat::Jpeg,
    }
}
