//! Pixpress Core - size-targeted image re-encoding
//!
//! This crate provides the compression pipeline behind pixpress: decoding any
//! supported upload, an optional fit-inside resize, output format
//! negotiation, and encoding either once at a fixed quality or through a
//! quality search that aims for a byte budget.
//!
//! # Pipeline
//!
//! 1. [`decode`] the input, applying EXIF orientation
//! 2. [`format::resolve_output_format`] picks the output container
//! 3. [`resize::fit_inside`] shrinks to the preset or user box, once
//! 4. encode through a [`Codec`], directly or via [`search::search_quality`]
//!
//! ```ignore
//! use pixpress_core::{CompressionRequest, Compressor};
//!
//! let input = std::fs::read("photo.png").unwrap();
//! let result = Compressor::new()
//!     .compress(&input, &CompressionRequest::target(500 * 1024))
//!     .unwrap();
//! println!("{} bytes as {}", result.size(), result.content_type());
//! ```

pub mod codec;
pub mod compress;
pub mod decode;
pub mod encode;
pub mod format;
pub mod preset;
pub mod request;
pub mod resize;
pub mod search;

pub use codec::{Codec, ImageCodec};
pub use compress::{output_file_name, CompressError, CompressionResult, Compressor};
pub use decode::{DecodeError, DecodedImage};
pub use encode::EncodeError;
pub use format::{detect_format, resolve_output_format, OutputFormat, RequestedFormat, SourceFormat};
pub use preset::{PresetSettings, PresetSize};
pub use request::{CompressionMode, CompressionOptions, CompressionRequest, FieldValue, OptionsError};
pub use resize::ResizeBox;
pub use search::{SearchOutcome, MAX_SEARCH_ATTEMPTS};
