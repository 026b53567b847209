//! A configured eigenspace: the corpus plus the face space last built from it.

use crate::builder::EigenspaceBuilder;
use crate::classifier::{self, Classification};
use crate::corpus::Corpus;
use crate::error::Result;
use crate::face::FaceImage;
use crate::projector::{self, WeightVector};
use crate::space::FaceSpace;

/// Owns one corpus for its lifetime and the face space built from it.
///
/// `build` only swaps in a new space once the whole computation succeeded,
/// so a failed rebuild leaves the previous space in place.
#[derive(Debug, Clone)]
pub struct Eigenfaces {
    corpus: Corpus,
    builder: EigenspaceBuilder,
    space: Option<FaceSpace>,
}

impl Eigenfaces {
    pub fn new(corpus: Corpus, builder: EigenspaceBuilder) -> Self {
        Self {
            corpus,
            builder,
            space: None,
        }
    }

    /// Uses a space built earlier, e.g. one loaded from disk.
    pub fn with_space(corpus: Corpus, builder: EigenspaceBuilder, space: FaceSpace) -> Result<Self> {
        corpus.dims().ensure(space.dims())?;
        Ok(Self {
            corpus,
            builder,
            space: Some(space),
        })
    }

    /// Builds or rebuilds the face space from the full corpus.
    pub fn build(&mut self) -> Result<&FaceSpace> {
        let space = self.builder.build(&self.corpus)?;
        Ok(self.space.insert(space))
    }

    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    pub fn builder(&self) -> &EigenspaceBuilder {
        &self.builder
    }

    pub fn space(&self) -> Option<&FaceSpace> {
        self.space.as_ref()
    }

    /// The current space, building it first if nothing has been built yet.
    pub fn space_or_build(&mut self) -> Result<&FaceSpace> {
        Ok(self.built()?.0)
    }

    fn built(&mut self) -> Result<(&FaceSpace, &Corpus)> {
        let space = match self.space.take() {
            Some(space) => space,
            None => self.builder.build(&self.corpus)?,
        };
        Ok((self.space.insert(space), &self.corpus))
    }

    pub fn project(&mut self, image: &FaceImage) -> Result<WeightVector> {
        projector::project(image, self.space_or_build()?)
    }

    /// Classifies `query` against the corpus users.
    pub fn classify(&mut self, query: &FaceImage) -> Result<Classification> {
        let (space, corpus) = self.built()?;
        classifier::classify(query, space, corpus.users())
    }
}
