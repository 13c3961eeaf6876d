//! Resize stage run once before encoding.
//!
//! The compression pipeline only ever shrinks: [`fit_inside`] scales an image
//! down until it fits a bounding box, preserving aspect ratio, and leaves it
//! untouched when it already fits. All functions return new `DecodedImage`
//! instances without modifying the input.

use serde::{Deserialize, Serialize};

use crate::decode::{DecodedImage, FilterType};
use crate::encode::EncodeError;

/// A bounding box for fit-inside resizing. `None` leaves an axis unconstrained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ResizeBox {
    pub max_width: Option<u32>,
    pub max_height: Option<u32>,
}

impl ResizeBox {
    pub fn new(max_width: Option<u32>, max_height: Option<u32>) -> Self {
        Self {
            max_width,
            max_height,
        }
    }

    /// A box that constrains nothing.
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// True when at least one axis is constrained, which triggers the stage.
    pub fn is_constrained(&self) -> bool {
        self.max_width.is_some() || self.max_height.is_some()
    }
}

/// Resize an image to exact dimensions.
///
/// # Errors
///
/// Returns `EncodeError::InvalidDimensions` for a zero target and
/// `EncodeError::InvalidPixelData` if the source buffer does not match its
/// dimensions.
pub fn resize(
    image: &DecodedImage,
    width: u32,
    height: u32,
    filter: FilterType,
) -> Result<DecodedImage, EncodeError> {
    if width == 0 || height == 0 {
        return Err(EncodeError::InvalidDimensions { width, height });
    }

    // Fast path: if dimensions match, just clone
    if image.width == width && image.height == height {
        return Ok(image.clone());
    }

    let source = image.to_dynamic().ok_or(EncodeError::InvalidPixelData {
        expected: image.width as usize * image.height as usize * image.layout.channels(),
        actual: image.pixels.len(),
    })?;

    let resized = source.resize_exact(width, height, filter.to_image_filter());

    Ok(DecodedImage::from_dynamic(resized))
}

/// Scale an image down to fit inside `bounds`, preserving aspect ratio.
///
/// Never crops and never enlarges: an image already inside the box (or an
/// unconstrained box) is returned unchanged.
pub fn fit_inside(
    image: &DecodedImage,
    bounds: ResizeBox,
    filter: FilterType,
) -> Result<DecodedImage, EncodeError> {
    let (new_width, new_height) = calculate_fit_inside(image.width, image.height, bounds);

    if new_width == image.width && new_height == image.height {
        return Ok(image.clone());
    }

    resize(image, new_width, new_height, filter)
}

/// Calculate the dimensions `width` x `height` shrinks to inside `bounds`.
///
/// Zero-sized box axes are treated as unconstrained.
pub fn calculate_fit_inside(width: u32, height: u32, bounds: ResizeBox) -> (u32, u32) {
    if width == 0 || height == 0 {
        return (width, height);
    }

    let axis_scale = |limit: Option<u32>, size: u32| match limit {
        Some(limit) if limit > 0 => limit as f64 / size as f64,
        _ => f64::INFINITY,
    };

    let scale = axis_scale(bounds.max_width, width)
        .min(axis_scale(bounds.max_height, height))
        .min(1.0);

    if scale >= 1.0 {
        return (width, height);
    }

    let new_width = ((width as f64 * scale).round() as u32).clamp(1, width);
    let new_height = ((height as f64 * scale).round() as u32).clamp(1, height);

    // Rounding must not push either side past its limit
    let new_width = match bounds.max_width {
        Some(limit) if limit > 0 => new_width.min(limit),
        _ => new_width,
    };
    let new_height = match bounds.max_height {
        Some(limit) if limit > 0 => new_height.min(limit),
        _ => new_height,
    };

    (new_width, new_height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::PixelLayout;

    fn create_test_image(width: u32, height: u32) -> DecodedImage {
        // Create a simple gradient image for testing
        let mut pixels = Vec::with_capacity((width * height * 3) as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.push(((x * 255) / width.max(1)) as u8); // R
                pixels.push(((y * 255) / height.max(1)) as u8); // G
                pixels.push(128); // B
            }
        }
        DecodedImage::new(width, height, pixels)
    }

    #[test]
    fn test_resize_basic() {
        let img = create_test_image(100, 50);
        let resized = resize(&img, 50, 25, FilterType::Bilinear).unwrap();

        assert_eq!(resized.width, 50);
        assert_eq!(resized.height, 25);
        assert_eq!(resized.pixels.len(), 50 * 25 * 3);
    }

    #[test]
    fn test_resize_same_dimensions() {
        let img = create_test_image(100, 50);
        let resized = resize(&img, 100, 50, FilterType::Bilinear).unwrap();
        assert_eq!(resized, img);
    }

    #[test]
    fn test_resize_zero_dimensions_error() {
        let img = create_test_image(100, 50);

        assert!(matches!(
            resize(&img, 0, 50, FilterType::Bilinear),
            Err(EncodeError::InvalidDimensions { .. })
        ));
        assert!(resize(&img, 50, 0, FilterType::Bilinear).is_err());
    }

    #[test]
    fn test_resize_mismatched_buffer_error() {
        let img = DecodedImage {
            width: 10,
            height: 10,
            layout: PixelLayout::Rgb8,
            pixels: vec![0u8; 12],
        };
        assert!(matches!(
            resize(&img, 5, 5, FilterType::Bilinear),
            Err(EncodeError::InvalidPixelData { .. })
        ));
    }

    #[test]
    fn test_resize_keeps_alpha_layout() {
        let img = DecodedImage::with_layout(40, 20, PixelLayout::Rgba8, vec![200u8; 40 * 20 * 4]);
        let resized = resize(&img, 20, 10, FilterType::Lanczos3).unwrap();
        assert_eq!(resized.layout, PixelLayout::Rgba8);
        assert_eq!(resized.pixels.len(), 20 * 10 * 4);
    }

    #[test]
    fn test_fit_inside_width_only() {
        let img = create_test_image(2560, 1440);
        let bounds = ResizeBox::new(Some(1280), None);
        let resized = fit_inside(&img, bounds, FilterType::Bilinear).unwrap();

        assert_eq!(resized.width, 1280);
        assert_eq!(resized.height, 720);
    }

    #[test]
    fn test_fit_inside_height_only() {
        let img = create_test_image(400, 800);
        let resized = fit_inside(&img, ResizeBox::new(None, Some(200)), FilterType::Bilinear).unwrap();

        assert_eq!(resized.width, 100);
        assert_eq!(resized.height, 200);
    }

    #[test]
    fn test_fit_inside_already_smaller() {
        let img = create_test_image(100, 50);
        let resized = fit_inside(&img, ResizeBox::new(Some(1280), None), FilterType::Bilinear).unwrap();

        // Small images are never upscaled
        assert_eq!(resized.width, 100);
        assert_eq!(resized.height, 50);
    }

    #[test]
    fn test_fit_inside_unbounded_is_noop() {
        let img = create_test_image(64, 32);
        let resized = fit_inside(&img, ResizeBox::unbounded(), FilterType::Bilinear).unwrap();
        assert_eq!(resized, img);
    }

    #[test]
    fn test_calculate_fit_inside_both_axes() {
        // Height is the binding constraint
        assert_eq!(
            calculate_fit_inside(6000, 4000, ResizeBox::new(Some(3000), Some(1000))),
            (1500, 1000)
        );
        // Width is the binding constraint
        assert_eq!(
            calculate_fit_inside(6000, 4000, ResizeBox::new(Some(600), Some(1000))),
            (600, 400)
        );
    }

    #[test]
    fn test_calculate_fit_inside_extreme_aspect() {
        // Height would round to zero without the floor of one pixel
        assert_eq!(
            calculate_fit_inside(10000, 1, ResizeBox::new(Some(100), None)),
            (100, 1)
        );
    }

    #[test]
    fn test_calculate_fit_inside_zero_limit_ignored() {
        assert_eq!(
            calculate_fit_inside(800, 600, ResizeBox::new(Some(0), None)),
            (800, 600)
        );
    }

    #[test]
    fn test_calculate_fit_inside_zero_input() {
        assert_eq!(
            calculate_fit_inside(0, 0, ResizeBox::new(Some(256), Some(256))),
            (0, 0)
        );
    }

    #[test]
    fn test_resize_box_is_constrained() {
        assert!(!ResizeBox::unbounded().is_constrained());
        assert!(ResizeBox::new(Some(10), None).is_constrained());
        assert!(ResizeBox::new(None, Some(10)).is_constrained());
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: fitting inside (1280, unbounded) never exceeds 1280 wide
        /// and never grows either side.
        #[test]
        fn prop_fit_inside_width_1280_bounds(
            width in 1u32..=8000,
            height in 1u32..=8000,
        ) {
            let (w, h) = calculate_fit_inside(width, height, ResizeBox::new(Some(1280), None));

            prop_assert!(w <= 1280, "width {} exceeds box", w);
            prop_assert!(w <= width && h <= height, "upscaled {}x{} to {}x{}", width, height, w, h);
            prop_assert!(w >= 1 && h >= 1);
            if width <= 1280 {
                prop_assert_eq!((w, h), (width, height));
            }
        }

        /// Property: results always fit any box and keep aspect ratio within rounding.
        #[test]
        fn prop_fit_inside_respects_box(
            width in 1u32..=6000,
            height in 1u32..=6000,
            max_width in 1u32..=4000,
            max_height in 1u32..=4000,
        ) {
            let (w, h) = calculate_fit_inside(width, height, ResizeBox::new(Some(max_width), Some(max_height)));

            prop_assert!(w <= max_width.max(1) && h <= max_height.max(1));
            prop_assert!(w <= width && h <= height);

            // Aspect ratio preserved to within one pixel of rounding on the short side
            let expected_h = w as f64 * height as f64 / width as f64;
            prop_assert!(
                (h as f64 - expected_h).abs() <= 1.0 + height as f64 / width as f64,
                "aspect drift: {}x{} -> {}x{}", width, height, w, h
            );
        }

        /// Property: fit_inside on real pixels matches the calculated size.
        #[test]
        fn prop_fit_inside_matches_calculation(
            width in 1u32..=64,
            height in 1u32..=64,
            max_width in 1u32..=64,
        ) {
            let img = DecodedImage::new(width, height, vec![90u8; (width * height * 3) as usize]);
            let bounds = ResizeBox::new(Some(max_width), None);
            let resized = fit_inside(&img, bounds, FilterType::Nearest).unwrap();

            prop_assert_eq!((resized.width, resized.height), calculate_fit_inside(width, height, bounds));
        }
    }
}
