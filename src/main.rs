use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use eigenface::{config, corpus, export, storage, Eigenfaces};
use log::info;

#[derive(Parser)]
#[command(name = "eigenface")]
#[command(version, about = "Eigenface face space: build a basis, then match faces against it")]
struct Cli {
    /// Config file (defaults to the compiled-in path)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the face space from the training and user images
    Build,
    /// Report nearest-user and face-space distances for an image
    Classify {
        image: PathBuf,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
        /// Rebuild the face space instead of loading the saved one
        #[arg(long)]
        rebuild: bool,
    },
    /// Print the weight vector of an image
    Project { image: PathBuf },
    /// Delete the saved face space
    Purge,
    /// Open config file in editor
    Config,
}

fn main() -> Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .format_target(false)
        .format_timestamp(None)
        .init();

    let cli = Cli::parse();
    let cfg_path = cli.config.as_deref();
    let cfg = config::load_config(cfg_path)?;

    match cli.command {
        Commands::Build => build(&cfg),
        Commands::Classify {
            image,
            json,
            rebuild,
        } => classify(&cfg, &image, json, rebuild),
        Commands::Project { image } => project(&cfg, &image),
        Commands::Purge => storage::purge(&cfg.model_path),
        Commands::Config => open_config(&cfg, cfg_path.unwrap_or(&config::CONFIG_PATH)),
    }
}

fn build(cfg: &config::Config) -> Result<()> {
    let mut eigen = Eigenfaces::new(corpus::load_corpus(cfg)?, cfg.builder());
    let space = eigen.build().context("Failed to build face space")?;

    export::export(space, &cfg.mean_face_dir, &cfg.eigenface_dir);
    storage::save_space(&cfg.model_path, &eigen).context("Failed to save face space")?;

    info!("✓ Face space saved to {}", cfg.model_path.display());
    Ok(())
}

fn classify(cfg: &config::Config, image: &Path, json: bool, rebuild: bool) -> Result<()> {
    let query = corpus::load_image(image)?;
    let mut eigen = storage::open(cfg, rebuild)?;
    let result = eigen.classify(&query).context("Failed to classify image")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!(
            "nearest user: {} (distance {:.2e}), face space distance: {:.2e}",
            result.nearest_user.label,
            result.nearest_identity_distance,
            result.face_space_distance
        );
    }
    Ok(())
}

fn project(cfg: &config::Config, image: &Path) -> Result<()> {
    let img = corpus::load_image(image)?;
    let mut eigen = storage::open(cfg, false)?;
    let weights = eigen.project(&img).context("Failed to project image")?;
    for (i, w) in weights.values().iter().enumerate() {
        println!("{i:>3} {w:.6e}");
    }
    Ok(())
}

fn open_config(cfg: &config::Config, config_path: &Path) -> Result<()> {
    if !config_path.exists() {
        info!("Writing default config to {}", config_path.display());
        config::save_config(cfg, Some(config_path)).context("Failed to write config")?;
    }

    let editor = env::var("EDITOR").unwrap_or_else(|_| "vi".to_string());

    info!("Opening config file: {:?}", config_path);

    let status = std::process::Command::new(editor)
        .arg(config_path)
        .status()
        .context("Failed to open editor")?;

    if !status.success() {
        anyhow::bail!("Editor exited with non-zero status");
    }

    Ok(())
}
