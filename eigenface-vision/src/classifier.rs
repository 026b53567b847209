use serde::{Deserialize, Serialize};

use crate::corpus::UserFace;
use crate::error::{FaceSpaceError, Result};
use crate::face::FaceImage;
use crate::projector::{project, WeightVector};
use crate::space::FaceSpace;

/// The known user closest to a query in face space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearestUser {
    pub index: usize,
    pub label: String,
}

/// Raw decision signals for one query. Thresholding is left to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    /// Smallest weight-vector distance to any known user.
    pub nearest_identity_distance: f64,
    pub nearest_user: NearestUser,
    /// Residual between the centered query and its reconstruction.
    pub face_space_distance: f64,
}

/// Distance between `image` and its projection back out of face space.
///
/// Large values mean the image is poorly explained by the basis.
pub fn face_space_distance(image: &FaceImage, space: &FaceSpace) -> Result<f64> {
    let weights = project(image, space)?;
    residual(image, space, &weights)
}

fn residual(image: &FaceImage, space: &FaceSpace, weights: &WeightVector) -> Result<f64> {
    let centered = space.center(image)?;
    let diff = centered - space.reconstruct(weights)?;
    Ok(diff.dot(&diff).sqrt())
}

/// Nearest known user to `query` and the query's distance from face space.
pub fn classify(query: &FaceImage, space: &FaceSpace, users: &[UserFace]) -> Result<Classification> {
    if users.is_empty() {
        return Err(FaceSpaceError::NoUsers);
    }
    let query_weights = project(query, space)?;

    // Every user is visited; ties keep the earliest.
    let mut best: Option<(usize, f64)> = None;
    for (index, user) in users.iter().enumerate() {
        let distance = query_weights.distance(&project(&user.image, space)?);
        if best.map_or(true, |(_, d)| distance < d) {
            best = Some((index, distance));
        }
    }
    let (index, nearest_identity_distance) = best.ok_or(FaceSpaceError::NoUsers)?;

    let face_space_distance = residual(query, space, &query_weights)?;
    log::debug!(
        "nearest user {} at {:.3e}, face space distance {:.3e}",
        users[index].label,
        nearest_identity_distance,
        face_space_distance
    );

    Ok(Classification {
        nearest_identity_distance,
        nearest_user: NearestUser {
            index,
            label: users[index].label.clone(),
        },
        face_space_distance,
    })
}
