//! Writes the mean face and eigenfaces out as images for inspection.

use anyhow::{Context, Result};
use eigenface_vision::FaceSpace;
use log::{info, warn};
use std::path::Path;

pub const MEAN_FACE_FILE: &str = "avg_face.png";

pub fn save_mean_face(space: &FaceSpace, dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    let file = dir.join(MEAN_FACE_FILE);
    space
        .mean_luma()
        .save(&file)
        .with_context(|| format!("writing {}", file.display()))
}

/// Writes eigenface `i` to `<dir>/<i>.png`.
pub fn save_eigenfaces(space: &FaceSpace, dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    for i in 0..space.face_number() {
        let Some(img) = space.eigenface_luma(i) else {
            continue;
        };
        let file = dir.join(format!("{i}.png"));
        img.save(&file)
            .with_context(|| format!("writing {}", file.display()))?;
    }
    Ok(())
}

/// Best effort: failures are logged and never propagated.
pub fn export(space: &FaceSpace, mean_face_dir: &Path, eigenface_dir: &Path) {
    match save_mean_face(space, mean_face_dir) {
        Ok(()) => info!("mean face written to {}", mean_face_dir.display()),
        Err(e) => warn!("could not export mean face: {:#}", e),
    }
    match save_eigenfaces(space, eigenface_dir) {
        Ok(()) => info!(
            "{} eigenfaces written to {}",
            space.face_number(),
            eigenface_dir.display()
        ),
        Err(e) => warn!("could not export eigenfaces: {:#}", e),
    }
}
