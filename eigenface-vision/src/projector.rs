use ndarray::{Array1, ArrayView1};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::face::FaceImage;
use crate::space::FaceSpace;

/// Coordinates of a mean-subtracted face in the eigenface basis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightVector(Array1<f64>);

impl WeightVector {
    pub fn new(values: Array1<f64>) -> Self {
        Self(values)
    }

    pub fn values(&self) -> ArrayView1<'_, f64> {
        self.0.view()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Euclidean distance between two weight vectors of equal length.
    pub fn distance(&self, other: &WeightVector) -> f64 {
        self.0
            .iter()
            .zip(other.0.iter())
            .map(|(a, b)| (a - b).powi(2))
            .sum::<f64>()
            .sqrt()
    }

    pub fn into_inner(self) -> Array1<f64> {
        self.0
    }
}

/// Projects `image` onto every eigenface of `space`.
///
/// Entry `i` is `eigenfaces[i] . (flatten(image) - mean)`.
pub fn project(image: &FaceImage, space: &FaceSpace) -> Result<WeightVector> {
    let centered = space.center(image)?;
    Ok(WeightVector(space.eigenfaces().dot(&centered)))
}
