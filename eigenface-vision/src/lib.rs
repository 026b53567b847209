//! Eigenface face space: basis construction, projection and distance metrics.

pub mod builder;
pub mod classifier;
pub mod corpus;
pub mod eigenface;
pub mod error;
pub mod face;
pub mod projector;
pub mod space;

// Re-export commonly used types
pub use builder::EigenspaceBuilder;
pub use classifier::{classify, face_space_distance, Classification, NearestUser};
pub use corpus::{Corpus, UserFace};
pub use eigenface::Eigenfaces;
pub use error::{FaceSpaceError, Result};
pub use face::{FaceImage, ImageDims};
pub use projector::{project, WeightVector};
pub use space::FaceSpace;
