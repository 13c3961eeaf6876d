//! Core types for image decoding.

use image::{DynamicImage, RgbImage, RgbaImage};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error types for image decoding operations.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The bytes are not in any supported image format.
    #[error("Invalid or unsupported image format")]
    InvalidFormat,

    /// The image file is corrupted or incomplete.
    #[error("Corrupted or incomplete image file: {0}")]
    CorruptedFile(String),

    /// The image dimensions exceed the decoder's allocation limits.
    #[error("Image is too large to decode")]
    LimitsExceeded,
}

/// Filter type for image resizing operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FilterType {
    /// Nearest neighbor interpolation (fastest, lowest quality).
    Nearest,
    /// Bilinear interpolation (fast, acceptable quality).
    Bilinear,
    /// Lanczos3 interpolation (slower, highest quality).
    #[default]
    Lanczos3,
}

impl FilterType {
    /// Convert to the image crate's FilterType.
    pub fn to_image_filter(self) -> image::imageops::FilterType {
        match self {
            FilterType::Nearest => image::imageops::FilterType::Nearest,
            FilterType::Bilinear => image::imageops::FilterType::Triangle,
            FilterType::Lanczos3 => image::imageops::FilterType::Lanczos3,
        }
    }
}

/// EXIF orientation values (1-8).
/// See: https://exiftool.org/TagNames/EXIF.html
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum Orientation {
    /// Normal (no transformation needed).
    #[default]
    Normal = 1,
    /// Horizontal flip.
    FlipHorizontal = 2,
    /// Rotate 180 degrees.
    Rotate180 = 3,
    /// Vertical flip.
    FlipVertical = 4,
    /// Transpose (flip horizontal + rotate 270 CW).
    Transpose = 5,
    /// Rotate 90 degrees clockwise.
    Rotate90CW = 6,
    /// Transverse (flip horizontal + rotate 90 CW).
    Transverse = 7,
    /// Rotate 270 degrees clockwise (90 CCW).
    Rotate270CW = 8,
}

impl From<u32> for Orientation {
    fn from(value: u32) -> Self {
        match value {
            1 => Orientation::Normal,
            2 => Orientation::FlipHorizontal,
            3 => Orientation::Rotate180,
            4 => Orientation::FlipVertical,
            5 => Orientation::Transpose,
            6 => Orientation::Rotate90CW,
            7 => Orientation::Transverse,
            8 => Orientation::Rotate270CW,
            _ => Orientation::Normal,
        }
    }
}

/// Channel layout of a decoded pixel buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PixelLayout {
    /// 3 bytes per pixel.
    #[default]
    Rgb8,
    /// 4 bytes per pixel, straight alpha.
    Rgba8,
}

impl PixelLayout {
    /// Bytes per pixel.
    #[inline]
    pub fn channels(self) -> usize {
        match self {
            PixelLayout::Rgb8 => 3,
            PixelLayout::Rgba8 => 4,
        }
    }

    /// The matching color type for the image crate's encoders.
    pub fn color_type(self) -> image::ExtendedColorType {
        match self {
            PixelLayout::Rgb8 => image::ExtendedColorType::Rgb8,
            PixelLayout::Rgba8 => image::ExtendedColorType::Rgba8,
        }
    }
}

/// A decoded image, oriented and ready to resize or encode.
///
/// This is the fixed input every encode attempt of a request works from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Channel layout of `pixels`.
    pub layout: PixelLayout,
    /// Pixel data in row-major order.
    /// Length should be width * height * layout.channels().
    pub pixels: Vec<u8>,
}

impl DecodedImage {
    /// Create a new RGB image with the given dimensions and pixel data.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        Self::with_layout(width, height, PixelLayout::Rgb8, pixels)
    }

    /// Create a new image with an explicit channel layout.
    pub fn with_layout(width: u32, height: u32, layout: PixelLayout, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(
            pixels.len(),
            width as usize * height as usize * layout.channels(),
            "Pixel buffer size mismatch"
        );
        Self {
            width,
            height,
            layout,
            pixels,
        }
    }

    /// Create a DecodedImage from an image::RgbImage.
    pub fn from_rgb_image(img: RgbImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            layout: PixelLayout::Rgb8,
            pixels: img.into_raw(),
        }
    }

    /// Create a DecodedImage from an image::RgbaImage.
    pub fn from_rgba_image(img: RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            layout: PixelLayout::Rgba8,
            pixels: img.into_raw(),
        }
    }

    /// Convert any decoded image, keeping alpha only when the source has it.
    pub fn from_dynamic(img: DynamicImage) -> Self {
        if img.color().has_alpha() {
            Self::from_rgba_image(img.into_rgba8())
        } else {
            Self::from_rgb_image(img.into_rgb8())
        }
    }

    /// Convert to a DynamicImage for resizing.
    ///
    /// Returns `None` when the buffer length does not match the dimensions.
    pub fn to_dynamic(&self) -> Option<DynamicImage> {
        match self.layout {
            PixelLayout::Rgb8 => RgbImage::from_raw(self.width, self.height, self.pixels.clone())
                .map(DynamicImage::ImageRgb8),
            PixelLayout::Rgba8 => RgbaImage::from_raw(self.width, self.height, self.pixels.clone())
                .map(DynamicImage::ImageRgba8),
        }
    }

    /// Whether the pixel data carries an alpha channel.
    pub fn has_alpha(&self) -> bool {
        self.layout == PixelLayout::Rgba8
    }

    /// RGB pixel data, dropping alpha if present.
    pub fn rgb_pixels(&self) -> Vec<u8> {
        match self.layout {
            PixelLayout::Rgb8 => self.pixels.clone(),
            PixelLayout::Rgba8 => self
                .pixels
                .chunks_exact(4)
                .flat_map(|px| [px[0], px[1], px[2]])
                .collect(),
        }
    }
}
