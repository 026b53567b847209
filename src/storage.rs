//! Saved face spaces, tagged with the corpus and builder settings behind them.

use anyhow::{Context, Result};
use eigenface_vision::{Corpus, EigenspaceBuilder, Eigenfaces, FaceSpace};
use log::info;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::Path;

use crate::config::Config;

#[derive(Debug, Serialize, Deserialize)]
struct SavedSpace {
    face_number: usize,
    skip_leading: usize,
    fingerprint: String,
    space: FaceSpace,
}

/// SHA-256 over group sizes, image sizes and every sample, in corpus order.
pub fn corpus_fingerprint(corpus: &Corpus) -> String {
    let mut hasher = Sha256::new();
    hasher.update((corpus.training().len() as u64).to_le_bytes());
    hasher.update((corpus.users().len() as u64).to_le_bytes());
    for img in corpus.images() {
        let dims = img.dims();
        hasher.update((dims.height as u64).to_le_bytes());
        hasher.update((dims.width as u64).to_le_bytes());
        for v in img.pixels().iter() {
            hasher.update(v.to_le_bytes());
        }
    }
    format!("{:x}", hasher.finalize())
}

/// Loads the face space saved at `path` if it was built from `corpus` by `builder`.
///
/// Returns `None` when nothing is saved or the saved space is stale. A file
/// that does not decode, or a space of another image size, is an error.
pub fn load_space(
    path: &Path,
    corpus: &Corpus,
    builder: &EigenspaceBuilder,
) -> Result<Option<FaceSpace>> {
    if !path.exists() {
        return Ok(None);
    }
    let data = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let saved: SavedSpace =
        postcard::from_bytes(&data).with_context(|| format!("decoding {}", path.display()))?;
    corpus
        .dims()
        .ensure(saved.space.dims())
        .with_context(|| format!("face space in {} does not match config", path.display()))?;

    if saved.face_number != builder.face_number || saved.skip_leading != builder.skip_leading {
        info!(
            "saved face space used face_number={} skip_leading={}, config has {} and {}",
            saved.face_number, saved.skip_leading, builder.face_number, builder.skip_leading
        );
        return Ok(None);
    }
    if saved.fingerprint != corpus_fingerprint(corpus) {
        info!("corpus changed since {} was built", path.display());
        return Ok(None);
    }
    Ok(Some(saved.space))
}

/// Saves the current face space of `eigen` with its corpus fingerprint.
pub fn save_space(path: &Path, eigen: &Eigenfaces) -> Result<()> {
    let space = eigen.space().context("face space has not been built")?;
    let saved = SavedSpace {
        face_number: eigen.builder().face_number,
        skip_leading: eigen.builder().skip_leading,
        fingerprint: corpus_fingerprint(eigen.corpus()),
        space: space.clone(),
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let data = postcard::to_allocvec(&saved)?;
    std::fs::write(path, data).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

/// Configured corpus with a face space that matches it.
///
/// The saved space is reused when it is current; otherwise, or when
/// `rebuild` is set, the space is built and saved again.
pub fn open(cfg: &Config, rebuild: bool) -> Result<Eigenfaces> {
    let corpus = crate::corpus::load_corpus(cfg)?;
    let builder = cfg.builder();
    let saved = if rebuild {
        None
    } else {
        load_space(&cfg.model_path, &corpus, &builder)?
    };

    match saved {
        Some(space) => {
            info!("Using face space from {}", cfg.model_path.display());
            Ok(Eigenfaces::with_space(corpus, builder, space)?)
        }
        None => {
            let mut eigen = Eigenfaces::new(corpus, builder);
            eigen.build().context("Failed to build face space")?;
            save_space(&cfg.model_path, &eigen).context("Failed to save face space")?;
            info!("Face space rebuilt and saved to {}", cfg.model_path.display());
            Ok(eigen)
        }
    }
}

pub fn purge(path: &Path) -> Result<()> {
    if path.exists() {
        std::fs::remove_file(path).with_context(|| format!("removing {}", path.display()))?;
    }
    Ok(())
}
