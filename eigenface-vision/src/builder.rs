//! Eigenface basis construction from a corpus.
//!
//! The `D x D` covariance of the centered corpus is never formed. The `N x N`
//! surrogate `L = A' A'^T` has the same non-zero eigenvalues, and each of its
//! eigenvectors `v` maps back to a covariance eigenvector as `A'^T v`, the
//! `v`-weighted sum of the centered rows.

use log::{debug, info};
use nalgebra::{DMatrix, SymmetricEigen};
use ndarray::{Array1, Array2, Axis};

use crate::corpus::Corpus;
use crate::error::{FaceSpaceError, Result};
use crate::space::FaceSpace;

pub const DEFAULT_FACE_NUMBER: usize = 25;

/// Leading eigenpairs dropped before selection. The strongest directions
/// tend to follow overall illumination rather than identity; set to 0 to
/// keep them.
pub const DEFAULT_SKIP_LEADING: usize = 2;

pub const DEFAULT_MAX_ITERATIONS: usize = 10_000;

// Eigenvalues at or below this fraction of the largest are treated as zero.
const NULL_EIGENVALUE_RATIO: f64 = 1e-10;

#[derive(Debug, Clone, PartialEq)]
pub struct EigenspaceBuilder {
    /// Eigenfaces kept in the basis (`K`).
    pub face_number: usize,
    /// Eigenpairs skipped, in descending eigenvalue order, before the `K` are taken.
    pub skip_leading: usize,
    /// Convergence tolerance handed to the symmetric eigen-solver.
    pub epsilon: f64,
    /// Solver iteration cap; exceeding it is a decomposition failure.
    pub max_iterations: usize,
}

impl Default for EigenspaceBuilder {
    fn default() -> Self {
        Self {
            face_number: DEFAULT_FACE_NUMBER,
            skip_leading: DEFAULT_SKIP_LEADING,
            epsilon: f64::EPSILON,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl EigenspaceBuilder {
    pub fn new(face_number: usize, skip_leading: usize) -> Self {
        Self {
            face_number,
            skip_leading,
            ..Self::default()
        }
    }

    /// Smallest corpus this builder accepts.
    pub fn min_samples(&self) -> usize {
        self.face_number + self.skip_leading
    }

    /// Computes the mean face and eigenface basis of `corpus`.
    pub fn build(&self, corpus: &Corpus) -> Result<FaceSpace> {
        let mut matrix = corpus.to_matrix()?;
        let n = matrix.nrows();
        if n < self.min_samples() {
            return Err(FaceSpaceError::InsufficientSamples {
                available: n,
                needed: self.min_samples(),
                face_number: self.face_number,
                skip_leading: self.skip_leading,
            });
        }

        let mean = matrix
            .mean_axis(Axis(0))
            .ok_or(FaceSpaceError::EmptyCorpus)?;
        matrix -= &mean;

        let surrogate = matrix.dot(&matrix.t());
        let (eigenvalues, eigenvectors) = self.decompose(&surrogate)?;

        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by(|&a, &b| eigenvalues[b].total_cmp(&eigenvalues[a]));
        let selected = &order[self.skip_leading..self.min_samples()];

        let largest = eigenvalues[order[0]].max(0.0);
        let null_threshold = largest * NULL_EIGENVALUE_RATIO;

        let d = corpus.dims().len();
        let mut eigenfaces = Array2::<f64>::zeros((self.face_number, d));
        let mut kept = Array1::<f64>::zeros(self.face_number);
        for (row_index, &pair) in selected.iter().enumerate() {
            let lambda = eigenvalues[pair];
            kept[row_index] = lambda;
            if lambda <= null_threshold {
                debug!("eigenface {row_index}: eigenvalue {lambda:.3e} is null, left empty");
                continue;
            }
            let weights = eigenvectors.column(pair);
            let mut face = weights.dot(&matrix);
            let norm = face.dot(&face).sqrt();
            if norm > 0.0 {
                face /= norm;
            }
            eigenfaces.row_mut(row_index).assign(&face);
        }

        info!(
            "built {} eigenfaces from {} images of {} (skipped {} leading)",
            self.face_number,
            n,
            corpus.dims(),
            self.skip_leading
        );
        debug!("selected eigenvalues: {kept:?}");

        Ok(FaceSpace::new(corpus.dims(), mean, eigenfaces, kept))
    }

    /// Eigenvalues and column eigenvectors of the symmetric surrogate matrix.
    fn decompose(&self, surrogate: &Array2<f64>) -> Result<(Array1<f64>, Array2<f64>)> {
        if surrogate.iter().any(|v| !v.is_finite()) {
            return Err(FaceSpaceError::Decomposition(
                "surrogate matrix has non-finite entries".to_string(),
            ));
        }
        let n = surrogate.nrows();
        let m = DMatrix::from_fn(n, n, |i, j| surrogate[[i, j]]);
        let eigen = SymmetricEigen::try_new(m, self.epsilon, self.max_iterations).ok_or_else(
            || {
                FaceSpaceError::Decomposition(format!(
                    "no convergence within {} iterations",
                    self.max_iterations
                ))
            },
        )?;

        let values: Array1<f64> = eigen.eigenvalues.iter().copied().collect();
        if values.iter().any(|v| !v.is_finite()) {
            return Err(FaceSpaceError::Decomposition(
                "solver produced non-finite eigenvalues".to_string(),
            ));
        }
        let vectors = Array2::from_shape_fn((n, n), |(i, j)| eigen.eigenvectors[(i, j)]);
        Ok((values, vectors))
    }
}
