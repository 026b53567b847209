use anyhow::{Context, Result};
use eigenface_vision::{builder, EigenspaceBuilder, ImageDims};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub static CONFIG_PATH: Lazy<&'static Path> = Lazy::new(|| {
    Path::new(option_env!("EIGENFACE_CONFIG_PATH").unwrap_or("/usr/local/etc/eigenface/config.toml"))
});

pub static DATA_PREFIX: Lazy<&'static Path> = Lazy::new(|| {
    Path::new(option_env!("EIGENFACE_DATA_PREFIX").unwrap_or("/usr/local/share/eigenface"))
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Generic training images.
    pub training_dir: PathBuf,
    /// One reference image per known user, labelled by file stem.
    pub users_dir: PathBuf,
    /// Where eigenface images are written after a build.
    pub eigenface_dir: PathBuf,
    /// Where the mean face image is written after a build.
    pub mean_face_dir: PathBuf,
    /// Built face space, reused by `classify` and `project`.
    pub model_path: PathBuf,
    pub height: usize,
    pub width: usize,
    pub face_number: usize,
    pub skip_leading: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            training_dir: DATA_PREFIX.join("training"),
            users_dir: DATA_PREFIX.join("users"),
            eigenface_dir: DATA_PREFIX.join("eigenfaces"),
            mean_face_dir: DATA_PREFIX.join("avg_face"),
            model_path: DATA_PREFIX.join("model.bin"),
            height: 218,
            width: 178,
            face_number: builder::DEFAULT_FACE_NUMBER,
            skip_leading: builder::DEFAULT_SKIP_LEADING,
        }
    }
}

impl Config {
    pub fn dims(&self) -> ImageDims {
        ImageDims::new(self.height, self.width)
    }

    pub fn builder(&self) -> EigenspaceBuilder {
        EigenspaceBuilder::new(self.face_number, self.skip_leading)
    }
}

pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let path = path.unwrap_or(&CONFIG_PATH);
    if !path.exists() {
        return Ok(Config::default());
    }
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading config at {}", path.display()))?;
    toml::from_str(&raw).with_context(|| format!("parsing config {}", path.display()))
}

/// Writes `cfg` as TOML, creating the parent directory if needed.
pub fn save_config(cfg: &Config, path: Option<&Path>) -> Result<()> {
    let path = path.unwrap_or(&CONFIG_PATH);
    let data = toml::to_string_pretty(cfg).context("serializing config")?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    std::fs::write(path, data).with_context(|| format!("writing config to {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let cfg: Config = toml::from_str("height = 64\nwidth = 48\nskip_leading = 0\n").unwrap();
        assert_eq!(cfg.dims(), ImageDims::new(64, 48));
        assert_eq!(cfg.skip_leading, 0);
        assert_eq!(cfg.face_number, builder::DEFAULT_FACE_NUMBER);
        assert_eq!(cfg.training_dir, Config::default().training_dir);
    }

    #[test]
    fn test_missing_file_is_default() {
        let cfg = load_config(Some(Path::new("/nonexistent/eigenface.toml"))).unwrap();
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn test_builder_follows_config() {
        let cfg = Config {
            face_number: 7,
            skip_leading: 1,
            ..Config::default()
        };
        let b = cfg.builder();
        assert_eq!((b.face_number, b.skip_leading), (7, 1));
    }

    #[test]
    fn test_save_then_load() {
        let dir = std::env::temp_dir().join(format!("eigenface-cfg-{}", uuid::Uuid::new_v4()));
        let path = dir.join("nested").join("config.toml");
        let cfg = Config {
            height: 32,
            width: 24,
            users_dir: PathBuf::from("/srv/faces/users"),
            ..Config::default()
        };
        save_config(&cfg, Some(&path)).unwrap();
        assert_eq!(load_config(Some(&path)).unwrap(), cfg);
        std::fs::remove_dir_all(&dir).ok();
    }
}
