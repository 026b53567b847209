//! Grayscale face images as typed numeric grids.

use std::fmt;

use image::{GrayImage, Luma};
use ndarray::{Array1, Array2, ArrayView1};
use serde::{Deserialize, Serialize};

use crate::error::{FaceSpaceError, Result};

/// Height and width shared by every image of one face space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageDims {
    pub height: usize,
    pub width: usize,
}

impl ImageDims {
    pub const fn new(height: usize, width: usize) -> Self {
        Self { height, width }
    }

    /// Length of the flattened sample vector.
    pub const fn len(&self) -> usize {
        self.height * self.width
    }

    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fails unless `other` equals `self`.
    pub fn ensure(&self, other: ImageDims) -> Result<()> {
        if *self == other {
            Ok(())
        } else {
            Err(FaceSpaceError::DimensionMismatch {
                expected: *self,
                actual: other,
            })
        }
    }
}

impl fmt::Display for ImageDims {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.height, self.width)
    }
}

/// A grayscale face image, samples kept at full precision in row-major order.
#[derive(Debug, Clone, PartialEq)]
pub struct FaceImage {
    pixels: Array2<f64>,
}

impl FaceImage {
    pub fn new(pixels: Array2<f64>) -> Self {
        Self { pixels }
    }

    /// Builds an image from a flattened row-major vector.
    pub fn from_flat(dims: ImageDims, samples: Vec<f64>) -> Result<Self> {
        let actual = samples.len();
        let pixels = Array2::from_shape_vec((dims.height, dims.width), samples).map_err(|_| {
            FaceSpaceError::LengthMismatch {
                expected: dims.len(),
                actual,
            }
        })?;
        Ok(Self { pixels })
    }

    pub fn from_luma(img: &GrayImage) -> Self {
        let (width, height) = img.dimensions();
        let pixels = Array2::from_shape_fn((height as usize, width as usize), |(y, x)| {
            img.get_pixel(x as u32, y as u32)[0] as f64
        });
        Self { pixels }
    }

    /// Quantizes to 8 bits: rounds, then clamps into `[0, 255]`.
    pub fn to_luma(&self) -> GrayImage {
        let dims = self.dims();
        GrayImage::from_fn(dims.width as u32, dims.height as u32, |x, y| {
            Luma([quantize(self.pixels[[y as usize, x as usize]])])
        })
    }

    pub fn dims(&self) -> ImageDims {
        let (height, width) = self.pixels.dim();
        ImageDims::new(height, width)
    }

    pub fn pixels(&self) -> &Array2<f64> {
        &self.pixels
    }

    pub fn flatten(&self) -> Array1<f64> {
        self.pixels.iter().copied().collect()
    }
}

pub(crate) fn quantize(value: f64) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

/// Linearly stretches `values` to span `[0, 255]`. A constant vector maps to 0.
pub fn stretch_to_luma(dims: ImageDims, values: ArrayView1<f64>) -> GrayImage {
    let (lo, hi) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    let span = hi - lo;
    GrayImage::from_fn(dims.width as u32, dims.height as u32, |x, y| {
        let v = values[y as usize * dims.width + x as usize];
        if span > 0.0 {
            Luma([quantize((v - lo) / span * 255.0)])
        } else {
            Luma([0])
        }
    })
}
