use ndarray::Array2;

use crate::error::{FaceSpaceError, Result};
use crate::face::{FaceImage, ImageDims};

/// A labelled reference image of a known individual.
#[derive(Debug, Clone)]
pub struct UserFace {
    pub label: String,
    pub image: FaceImage,
}

impl UserFace {
    pub fn new(label: impl Into<String>, image: FaceImage) -> Self {
        Self {
            label: label.into(),
            image,
        }
    }
}

/// Generic training images plus known users, all of one size.
///
/// Both groups feed basis construction; only users are matched against.
#[derive(Debug, Clone)]
pub struct Corpus {
    dims: ImageDims,
    training: Vec<FaceImage>,
    users: Vec<UserFace>,
}

impl Corpus {
    pub fn new(dims: ImageDims, training: Vec<FaceImage>, users: Vec<UserFace>) -> Result<Self> {
        for img in training.iter().chain(users.iter().map(|u| &u.image)) {
            dims.ensure(img.dims())?;
        }
        Ok(Self {
            dims,
            training,
            users,
        })
    }

    pub fn dims(&self) -> ImageDims {
        self.dims
    }

    pub fn training(&self) -> &[FaceImage] {
        &self.training
    }

    pub fn users(&self) -> &[UserFace] {
        &self.users
    }

    /// Number of images across both groups.
    pub fn len(&self) -> usize {
        self.training.len() + self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Training images followed by user images, in load order.
    pub fn images(&self) -> impl Iterator<Item = &FaceImage> {
        self.training.iter().chain(self.users.iter().map(|u| &u.image))
    }

    /// Stacks every flattened image as one row of an `N x D` matrix.
    pub fn to_matrix(&self) -> Result<Array2<f64>> {
        if self.is_empty() {
            return Err(FaceSpaceError::EmptyCorpus);
        }
        let d = self.dims.len();
        let mut matrix = Array2::<f64>::zeros((self.len(), d));
        for (mut row, img) in matrix.rows_mut().into_iter().zip(self.images()) {
            row.assign(&img.flatten());
        }
        Ok(matrix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn flat(v: f64) -> FaceImage {
        FaceImage::new(Array2::from_elem((2, 2), v))
    }

    #[test]
    fn test_rejects_mixed_sizes() {
        let odd = FaceImage::new(Array2::zeros((3, 2)));
        let err = Corpus::new(ImageDims::new(2, 2), vec![flat(0.0), odd], vec![]).unwrap_err();
        assert_eq!(
            err,
            FaceSpaceError::DimensionMismatch {
                expected: ImageDims::new(2, 2),
                actual: ImageDims::new(3, 2),
            }
        );
    }

    #[test]
    fn test_matrix_puts_users_after_training() {
        let corpus = Corpus::new(
            ImageDims::new(2, 2),
            vec![flat(1.0), flat(2.0)],
            vec![UserFace::new("alice", flat(3.0))],
        )
        .unwrap();
        let m = corpus.to_matrix().unwrap();
        assert_eq!(m.dim(), (3, 4));
        assert_eq!(m.column(0), array![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_empty_corpus_has_no_matrix() {
        let corpus = Corpus::new(ImageDims::new(2, 2), vec![], vec![]).unwrap();
        assert_eq!(corpus.to_matrix().unwrap_err(), FaceSpaceError::EmptyCorpus);
    }
}
