use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use anyhow::{Result, anyhow};
use sparknomad_core::Config;
use tracing_subscriber::EnvFilter;

/// Log to a file, the terminal belongs to the UI. `RUST_LOG` overrides the `info` default.
pub fn init(log_file: Option<&Path>) -> Result<PathBuf> {
    let path = match log_file {
        Some(p) => p.to_path_buf(),
        None => Config::config_dir()?.join("sparknomad.log"),
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let file = OpenOptions::new().create(true).append(true).open(&path)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow!("Failed to initialize logging: {}", e))?;

    Ok(path)
}
