//! Loads grayscale face images from directories.

use anyhow::{Context, Result};
use eigenface_vision::{Corpus, FaceImage, UserFace};
use log::{debug, info};
use std::path::{Path, PathBuf};

use crate::config::Config;

/// Decodes every image directly under `dir`, ordered by file name.
///
/// Entries that cannot be read or decoded are skipped. A missing directory
/// yields no images.
pub fn load_dir(dir: &Path) -> Result<Vec<(PathBuf, FaceImage)>> {
    if !dir.exists() {
        debug!("image directory {} does not exist", dir.display());
        return Ok(vec![]);
    }
    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)
        .with_context(|| format!("listing {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file())
        .collect();
    paths.sort();

    let images = paths
        .into_iter()
        .filter_map(|path| match load_image(&path) {
            Ok(img) => Some((path, img)),
            Err(e) => {
                debug!("skipping {}: {:#}", path.display(), e);
                None
            }
        })
        .collect();
    Ok(images)
}

pub fn load_image(path: &Path) -> Result<FaceImage> {
    let img = image::open(path).with_context(|| format!("decoding {}", path.display()))?;
    Ok(FaceImage::from_luma(&img.to_luma8()))
}

fn label_of(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Training and user images from the configured directories.
pub fn load_corpus(cfg: &Config) -> Result<Corpus> {
    let training: Vec<FaceImage> = load_dir(&cfg.training_dir)?
        .into_iter()
        .map(|(_, img)| img)
        .collect();
    let users: Vec<UserFace> = load_dir(&cfg.users_dir)?
        .into_iter()
        .map(|(path, img)| UserFace::new(label_of(&path), img))
        .collect();
    info!(
        "loaded {} training image(s) and {} user(s)",
        training.len(),
        users.len()
    );
    Corpus::new(cfg.dims(), training, users).context("assembling corpus")
}
