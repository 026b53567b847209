use thiserror::Error;

use crate::face::ImageDims;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FaceSpaceError {
    #[error("corpus contains no images")]
    EmptyCorpus,
    #[error("corpus has {available} images, building {face_number} eigenfaces after skipping {skip_leading} needs at least {needed}")]
    InsufficientSamples {
        available: usize,
        needed: usize,
        face_number: usize,
        skip_leading: usize,
    },
    #[error("eigen-decomposition failed: {0}")]
    Decomposition(String),
    #[error("image is {actual}, face space expects {expected}")]
    DimensionMismatch {
        expected: ImageDims,
        actual: ImageDims,
    },
    #[error("vector has {actual} entries, expected {expected}")]
    LengthMismatch { expected: usize, actual: usize },
    #[error("no known users to classify against")]
    NoUsers,
}

pub type Result<T> = std::result::Result<T, FaceSpaceError>;
