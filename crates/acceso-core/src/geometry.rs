//! Raster geometry: quarter-turn rotation and aspect-preserving scaling.
//!
//! Transforms never mutate their input; each returns a new image.

use image::DynamicImage;
use tracing::debug;

/// A quarter-turn rotation about the image center.
///
/// Classification inputs only ever need the EXIF quarter turns; arbitrary
/// angles are intentionally unsupported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rotation {
    /// Leave the image as-is.
    #[default]
    None,
    /// 90 degrees clockwise.
    Deg90,
    /// 180 degrees.
    Deg180,
    /// 270 degrees clockwise.
    Deg270,
}

impl Rotation {
    /// Map an angle in degrees to a quarter turn.
    ///
    /// 90, 180 and 270 map to their turns; every other value (including
    /// negatives and non-multiples of 90) maps to `None`.
    pub fn from_degrees(degrees: i32) -> Self {
        match degrees.rem_euclid(360) {
            90 => Rotation::Deg90,
            180 => Rotation::Deg180,
            270 => Rotation::Deg270,
            _ => Rotation::None,
        }
    }
}

/// Rotate an image by a quarter turn, returning a new image.
///
/// Quarter turns are pixel-exact: no resampling and no content loss.
pub fn rotate(image: &DynamicImage, rotation: Rotation) -> DynamicImage {
    match rotation {
        Rotation::None => image.clone(),
        Rotation::Deg90 => image.rotate90(),
        Rotation::Deg180 => image.rotate180(),
        Rotation::Deg270 => image.rotate270(),
    }
}

/// Scale an image so its larger dimension does not exceed `max_dimension`,
/// preserving aspect ratio.
///
/// Images already within bounds are returned unchanged (pixel data is
/// untouched). Downscaling uses Lanczos3 resampling and computes the minor
/// dimension as `round(other * max / larger)`.
pub fn scale_to_max(image: &DynamicImage, max_dimension: u32) -> DynamicImage {
    let width = image.width();
    let height = image.height();

    let (new_width, new_height) = fit_within(width, height, max_dimension);
    if (new_width, new_height) == (width, height) {
        return image.clone();
    }

    debug!(
        "Scaling {}x{} down to {}x{}",
        width, height, new_width, new_height
    );

    image.resize_exact(new_width, new_height, image::imageops::FilterType::Lanczos3)
}

/// Compute the dimensions that fit `width` x `height` within `max_dimension`.
fn fit_within(width: u32, height: u32, max_dimension: u32) -> (u32, u32) {
    let larger = width.max(height);

    if larger <= max_dimension {
        return (width, height);
    }

    let scale = max_dimension as f64 / larger as f64;
    if width >= height {
        let new_height = ((height as f64 * scale).round() as u32).max(1);
        (max_dimension, new_height)
    } else {
        let new_width = ((width as f64 * scale).round() as u32).max(1);
        (new_width, max_dimension)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use pretty_assertions::assert_eq;

    fn gradient_image(width: u32, height: u32) -> DynamicImage {
        let img = RgbaImage::from_fn(width, height, |x, y| {
            Rgba([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8, 255])
        });
        DynamicImage::ImageRgba8(img)
    }

    #[test]
    fn from_degrees_maps_quarter_turns() {
        assert_eq!(Rotation::from_degrees(90), Rotation::Deg90);
        assert_eq!(Rotation::from_degrees(180), Rotation::Deg180);
        assert_eq!(Rotation::from_degrees(270), Rotation::Deg270);
        assert_eq!(Rotation::from_degrees(450), Rotation::Deg90);
        assert_eq!(Rotation::from_degrees(-90), Rotation::Deg270);
        assert_eq!(Rotation::from_degrees(0), Rotation::None);
        assert_eq!(Rotation::from_degrees(45), Rotation::None);
    }

    #[test]
    fn rotate_quarter_turns_swap_dimensions() {
        let img = gradient_image(4, 2);
        let rotated = rotate(&img, Rotation::Deg90);
        assert_eq!((rotated.width(), rotated.height()), (2, 4));

        let back = rotate(&rotated, Rotation::Deg270);
        assert_eq!((back.width(), back.height()), (4, 2));
    }

    #[test]
    fn rotate_90_then_270_is_identity() {
        let img = gradient_image(5, 3);
        let roundtrip = rotate(&rotate(&img, Rotation::Deg90), Rotation::Deg270);
        assert_eq!(img.to_rgba8().as_raw(), roundtrip.to_rgba8().as_raw());
    }

    #[test]
    fn rotate_180_twice_is_identity() {
        let img = gradient_image(3, 3);
        let roundtrip = rotate(&rotate(&img, Rotation::Deg180), Rotation::Deg180);
        assert_eq!(img.to_rgba8().as_raw(), roundtrip.to_rgba8().as_raw());
    }

    #[test]
    fn scale_within_bounds_is_noop() {
        let img = gradient_image(100, 60);
        let scaled = scale_to_max(&img, 128);
        assert_eq!((scaled.width(), scaled.height()), (100, 60));
        assert_eq!(img.to_rgba8().as_raw(), scaled.to_rgba8().as_raw());
    }

    #[test]
    fn scale_caps_larger_dimension() {
        let img = gradient_image(400, 200);
        let scaled = scale_to_max(&img, 128);
        assert_eq!(scaled.width(), 128);
        assert_eq!(scaled.height(), 64);
    }

    #[test]
    fn scale_caps_height_when_portrait() {
        let img = gradient_image(200, 400);
        let scaled = scale_to_max(&img, 128);
        assert_eq!(scaled.width(), 64);
        assert_eq!(scaled.height(), 128);
    }

    #[test]
    fn scale_preserves_aspect_within_rounding() {
        let img = gradient_image(1920, 1080);
        let scaled = scale_to_max(&img, 500);
        assert_eq!(scaled.width(), 500);
        // 1080 * 500 / 1920 = 281.25 -> 281
        assert_eq!(scaled.height(), 281);
    }

    #[test]
    fn scale_is_idempotent() {
        let img = gradient_image(777, 333);
        let once = scale_to_max(&img, 128);
        let twice = scale_to_max(&once, 128);
        assert_eq!((once.width(), once.height()), (twice.width(), twice.height()));
        assert_eq!(once.to_rgba8().as_raw(), twice.to_rgba8().as_raw());
    }

    #[test]
    fn fit_within_never_exceeds_max() {
        for &(w, h) in &[(1u32, 1u32), (128, 128), (129, 64), (3000, 50), (50, 3000)] {
            let (nw, nh) = fit_within(w, h, 128);
            assert!(nw.max(nh) <= 128, "{}x{} -> {}x{}", w, h, nw, nh);
        }
    }
}
