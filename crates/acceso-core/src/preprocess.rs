//! Image-to-tensor preprocessing for the classifier.

use image::DynamicImage;
use ndarray::Array4;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::PreprocessError;

/// Channel normalization applied while filling the input tensor.
///
/// The bundled model dictates which policy is correct; both historical
/// variants of the capture pipeline are supported, so the policy is
/// configuration rather than a constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Normalization {
    /// Scale each channel to [-1, 1] via `(c / 127.5) - 1`. Default.
    #[default]
    SignedUnit,
    /// Pass raw channel values through as floats in [0, 255]; the model
    /// graph is expected to normalize internally.
    Raw,
}

impl Normalization {
    /// Normalize one 8-bit channel value.
    pub fn apply(self, channel: u8) -> f32 {
        match self {
            Normalization::SignedUnit => (channel as f32 / 127.5) - 1.0,
            Normalization::Raw => channel as f32,
        }
    }
}

/// Converts raster images into fixed-shape model input tensors.
///
/// Output layout is NHWC: `[1, height, width, 3]`, row-major, R,G,B
/// interleaved per pixel, 32-bit floats in native byte order. Alpha is
/// discarded.
#[derive(Debug, Clone)]
pub struct TensorPreprocessor {
    width: u32,
    height: u32,
    normalization: Normalization,
}

impl TensorPreprocessor {
    /// Create a preprocessor for the given model input size.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            normalization: Normalization::default(),
        }
    }

    /// Select the normalization policy.
    pub fn with_normalization(mut self, normalization: Normalization) -> Self {
        self.normalization = normalization;
        self
    }

    /// The tensor shape this preprocessor produces.
    pub fn tensor_shape(&self) -> [usize; 4] {
        [1, self.height as usize, self.width as usize, 3]
    }

    /// Active normalization policy.
    pub fn normalization(&self) -> Normalization {
        self.normalization
    }

    /// Convert an image of any size into the model input tensor.
    ///
    /// The image is resampled to the configured width x height first, so the
    /// output length is always `width * height * 3`.
    pub fn to_input_tensor(&self, image: &DynamicImage) -> Result<Array4<f32>, PreprocessError> {
        if self.width == 0 || self.height == 0 {
            return Err(PreprocessError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }

        let resized = if (image.width(), image.height()) == (self.width, self.height) {
            image.clone()
        } else {
            image.resize_exact(
                self.width,
                self.height,
                image::imageops::FilterType::Lanczos3,
            )
        };

        let rgb = resized.to_rgb8();

        let mut data = Vec::with_capacity(self.width as usize * self.height as usize * 3);
        for pixel in rgb.pixels() {
            data.push(self.normalization.apply(pixel[0]));
            data.push(self.normalization.apply(pixel[1]));
            data.push(self.normalization.apply(pixel[2]));
        }

        trace!(
            "Preprocessed image into {} floats ({:?})",
            data.len(),
            self.normalization
        );

        let [n, h, w, c] = self.tensor_shape();
        Array4::from_shape_vec((n, h, w, c), data)
            .map_err(|e| PreprocessError::ShapeMismatch(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage, Rgba, RgbaImage};
    use pretty_assertions::assert_eq;

    fn solid_rgb(width: u32, height: u32, rgb: [u8; 3]) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb(rgb)))
    }

    #[test]
    fn signed_unit_maps_channel_extremes() {
        assert_eq!(Normalization::SignedUnit.apply(0), -1.0);
        assert_eq!(Normalization::SignedUnit.apply(255), 1.0);
        // 127.5 / 127.5 - 1 == 0 is unreachable on u8; midpoints straddle zero.
        assert!(Normalization::SignedUnit.apply(127) < 0.0);
        assert!(Normalization::SignedUnit.apply(128) > 0.0);
    }

    #[test]
    fn raw_passes_values_through() {
        assert_eq!(Normalization::Raw.apply(0), 0.0);
        assert_eq!(Normalization::Raw.apply(128), 128.0);
        assert_eq!(Normalization::Raw.apply(255), 255.0);
    }

    #[test]
    fn tensor_length_is_width_height_channels() {
        let pre = TensorPreprocessor::new(32, 24);
        for &(w, h) in &[(32u32, 24u32), (640, 480), (3, 7), (1000, 10)] {
            let tensor = pre.to_input_tensor(&solid_rgb(w, h, [10, 20, 30])).unwrap();
            assert_eq!(tensor.len(), 32 * 24 * 3);
            assert_eq!(tensor.shape(), &[1, 24, 32, 3]);
        }
    }

    #[test]
    fn solid_red_under_signed_unit_policy() {
        let pre = TensorPreprocessor::new(64, 64).with_normalization(Normalization::SignedUnit);
        let tensor = pre.to_input_tensor(&solid_rgb(64, 64, [255, 0, 0])).unwrap();

        for row in tensor.index_axis(ndarray::Axis(0), 0).outer_iter() {
            for pixel in row.outer_iter() {
                assert_eq!(pixel[0], 1.0);
                assert_eq!(pixel[1], -1.0);
                assert_eq!(pixel[2], -1.0);
            }
        }
    }

    #[test]
    fn solid_red_under_raw_policy() {
        let pre = TensorPreprocessor::new(64, 64).with_normalization(Normalization::Raw);
        let tensor = pre.to_input_tensor(&solid_rgb(64, 64, [255, 0, 0])).unwrap();

        let flat: Vec<f32> = tensor.iter().cloned().collect();
        for chunk in flat.chunks_exact(3) {
            assert_eq!(chunk, &[255.0, 0.0, 0.0]);
        }
    }

    #[test]
    fn rgb_values_are_interleaved_in_scan_order() {
        // 2x1 image: left pixel red, right pixel blue.
        let mut img = RgbImage::new(2, 1);
        img.put_pixel(0, 0, Rgb([255, 0, 0]));
        img.put_pixel(1, 0, Rgb([0, 0, 255]));

        let pre = TensorPreprocessor::new(2, 1).with_normalization(Normalization::Raw);
        let tensor = pre
            .to_input_tensor(&DynamicImage::ImageRgb8(img))
            .unwrap();

        let flat: Vec<f32> = tensor.iter().cloned().collect();
        assert_eq!(flat, vec![255.0, 0.0, 0.0, 0.0, 0.0, 255.0]);
    }

    #[test]
    fn alpha_channel_is_discarded() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            4,
            4,
            Rgba([50, 100, 150, 7]),
        ));
        let pre = TensorPreprocessor::new(4, 4).with_normalization(Normalization::Raw);
        let tensor = pre.to_input_tensor(&img).unwrap();

        assert_eq!(tensor.len(), 4 * 4 * 3);
        let flat: Vec<f32> = tensor.iter().cloned().collect();
        assert_eq!(&flat[..3], &[50.0, 100.0, 150.0]);
    }

    #[test]
    fn oversized_input_is_resampled_to_fixed_shape() {
        let pre = TensorPreprocessor::new(16, 16);
        let tensor = pre.to_input_tensor(&solid_rgb(300, 200, [0, 255, 0])).unwrap();
        assert_eq!(tensor.shape(), &[1, 16, 16, 3]);
    }

    #[test]
    fn zero_dimensions_are_rejected() {
        let pre = TensorPreprocessor::new(0, 16);
        let err = pre.to_input_tensor(&solid_rgb(8, 8, [0, 0, 0])).unwrap_err();
        assert!(matches!(err, PreprocessError::InvalidDimensions { .. }));
    }
}
