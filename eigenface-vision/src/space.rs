//! The mean face and eigenface basis produced by one build.

use ndarray::{Array1, Array2, ArrayView1};
use serde::{Deserialize, Serialize};

use crate::error::{FaceSpaceError, Result};
use crate::face::{quantize, stretch_to_luma, FaceImage, ImageDims};
use crate::projector::WeightVector;

/// Mean face and `K x D` eigenface basis, always from the same build.
///
/// Fields are private so the pair can only be replaced as a whole.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawFaceSpace")]
pub struct FaceSpace {
    dims: ImageDims,
    mean: Array1<f64>,
    eigenfaces: Array2<f64>,
    eigenvalues: Array1<f64>,
}

// Wire form of `FaceSpace`, checked before it becomes one.
#[derive(Deserialize)]
struct RawFaceSpace {
    dims: ImageDims,
    mean: Array1<f64>,
    eigenfaces: Array2<f64>,
    eigenvalues: Array1<f64>,
}

impl TryFrom<RawFaceSpace> for FaceSpace {
    type Error = FaceSpaceError;

    fn try_from(raw: RawFaceSpace) -> Result<Self> {
        let space = Self {
            dims: raw.dims,
            mean: raw.mean,
            eigenfaces: raw.eigenfaces,
            eigenvalues: raw.eigenvalues,
        };
        space.validate()?;
        Ok(space)
    }
}

impl FaceSpace {
    pub(crate) fn new(
        dims: ImageDims,
        mean: Array1<f64>,
        eigenfaces: Array2<f64>,
        eigenvalues: Array1<f64>,
    ) -> Self {
        debug_assert_eq!(mean.len(), dims.len());
        debug_assert_eq!(eigenfaces.ncols(), dims.len());
        debug_assert_eq!(eigenfaces.nrows(), eigenvalues.len());
        Self {
            dims,
            mean,
            eigenfaces,
            eigenvalues,
        }
    }

    /// Checks that mean, basis and eigenvalues agree with `dims` and each other.
    pub fn validate(&self) -> Result<()> {
        let d = self.dims.len();
        for actual in [self.mean.len(), self.eigenfaces.ncols()] {
            if actual != d {
                return Err(FaceSpaceError::LengthMismatch { expected: d, actual });
            }
        }
        if self.eigenvalues.len() != self.eigenfaces.nrows() {
            return Err(FaceSpaceError::LengthMismatch {
                expected: self.eigenfaces.nrows(),
                actual: self.eigenvalues.len(),
            });
        }
        Ok(())
    }

    pub fn dims(&self) -> ImageDims {
        self.dims
    }

    /// Number of eigenfaces (`K`).
    pub fn face_number(&self) -> usize {
        self.eigenfaces.nrows()
    }

    pub fn mean(&self) -> ArrayView1<'_, f64> {
        self.mean.view()
    }

    pub fn eigenfaces(&self) -> &Array2<f64> {
        &self.eigenfaces
    }

    /// Eigenvalue of the surrogate matrix behind each eigenface, in basis order.
    pub fn eigenvalues(&self) -> ArrayView1<'_, f64> {
        self.eigenvalues.view()
    }

    pub fn mean_face(&self) -> Result<FaceImage> {
        FaceImage::from_flat(self.dims, self.mean.to_vec())
    }

    /// Mean face quantized to 8 bits for storage.
    pub fn mean_luma(&self) -> image::GrayImage {
        image::GrayImage::from_fn(self.dims.width as u32, self.dims.height as u32, |x, y| {
            image::Luma([quantize(self.mean[y as usize * self.dims.width + x as usize])])
        })
    }

    /// Eigenface `index` stretched into the displayable intensity range.
    pub fn eigenface_luma(&self, index: usize) -> Option<image::GrayImage> {
        (index < self.face_number())
            .then(|| stretch_to_luma(self.dims, self.eigenfaces.row(index)))
    }

    /// Flattened image minus the mean face.
    pub fn center(&self, image: &FaceImage) -> Result<Array1<f64>> {
        self.dims.ensure(image.dims())?;
        Ok(image.flatten() - &self.mean)
    }

    /// Centered approximation `sum_i w[i] * eigenfaces[i]`.
    pub fn reconstruct(&self, weights: &WeightVector) -> Result<Array1<f64>> {
        if weights.len() != self.face_number() {
            return Err(FaceSpaceError::LengthMismatch {
                expected: self.face_number(),
                actual: weights.len(),
            });
        }
        Ok(weights.values().dot(&self.eigenfaces))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn space(mean: Array1<f64>, eigenfaces: Array2<f64>, eigenvalues: Array1<f64>) -> FaceSpace {
        FaceSpace {
            dims: ImageDims::new(2, 2),
            mean,
            eigenfaces,
            eigenvalues,
        }
    }

    #[test]
    fn test_validate_accepts_consistent_pair() {
        let ok = space(Array1::zeros(4), Array2::zeros((1, 4)), array![1.0]);
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_short_mean() {
        let bad = space(Array1::zeros(3), Array2::zeros((1, 4)), array![1.0]);
        assert_eq!(
            bad.validate().unwrap_err(),
            FaceSpaceError::LengthMismatch {
                expected: 4,
                actual: 3,
            }
        );
    }

    #[test]
    fn test_validate_rejects_wide_basis() {
        let bad = space(Array1::zeros(4), Array2::zeros((1, 5)), array![1.0]);
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_missing_eigenvalues() {
        let bad = space(Array1::zeros(4), Array2::zeros((2, 4)), array![1.0]);
        assert_eq!(
            bad.validate().unwrap_err(),
            FaceSpaceError::LengthMismatch {
                expected: 2,
                actual: 1,
            }
        );
    }
}
