pub mod config;
pub mod corpus;
pub mod export;
pub mod storage;

// Re-export face space types for convenience
pub use eigenface_vision::{
    Classification, Corpus, EigenspaceBuilder, Eigenfaces, FaceImage, FaceSpace, FaceSpaceError,
    ImageDims, UserFace, WeightVector,
};
