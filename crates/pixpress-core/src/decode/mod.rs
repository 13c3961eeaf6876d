//! Image decoding for the compression pipeline.
//!
//! Input arrives as opaque encoded bytes of any supported container. Decoding
//! produces a [`DecodedImage`] with EXIF orientation already applied, keeping
//! an alpha channel only when the source has one.
//!
//! # Examples
//!
//! ```ignore
//! use pixpress_core::decode::decode_image;
//!
//! let bytes = std::fs::read("photo.jpg").unwrap();
//! let image = decode_image(&bytes).unwrap();
//! println!("Decoded {}x{} image", image.width, image.height);
//! ```

mod reader;
mod types;

pub use reader::decode_image;
pub use types::{DecodeError, DecodedImage, FilterType, Orientation, PixelLayout};
