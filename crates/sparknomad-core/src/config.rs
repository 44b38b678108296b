use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use anyhow::{Result, anyhow};

pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Environment variables checked for the API key, in priority order
const API_KEY_VARS: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub base_url: Option<String>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&Self::get_config_path()?)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Self::new());
        }

        let config_content = fs::read_to_string(config_path)?;
        let config: Config = serde_json::from_str(&config_content)?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::get_config_path()?)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        // Create config directory if it doesn't exist
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let config_content = serde_json::to_string_pretty(self)?;
        fs::write(config_path, config_content)?;
        tracing::debug!(path = %config_path.display(), "saved config");
        Ok(())
    }

    pub fn save_api_key(key: &str) -> Result<()> {
        Self::save_api_key_to(&Self::get_config_path()?, key)
    }

    /// Store the key, keeping the other settings. An unreadable config is
    /// replaced by defaults plus the key.
    pub fn save_api_key_to(config_path: &Path, key: &str) -> Result<()> {
        let mut config = match Self::load_from(config_path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(path = %config_path.display(), "Replacing unreadable config: {}", e);
                Self::new()
            }
        };
        config.api_key = Some(key.to_string());
        config.save_to(config_path)
    }

    /// Load `.env` from the working directory, if any
    pub fn load_dotenv() {
        match dotenvy::dotenv() {
            Ok(path) => tracing::debug!(path = %path.display(), "loaded .env"),
            Err(e) if e.not_found() => {}
            Err(e) => tracing::warn!("failed to load .env: {}", e),
        }
    }

    /// API key: environment first, then the config file
    pub fn resolve_api_key(&self) -> Option<String> {
        self.resolve_api_key_with(|var| std::env::var(var).ok())
    }

    pub fn resolve_api_key_with<F>(&self, env: F) -> Option<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        API_KEY_VARS
            .iter()
            .filter_map(|var| env(*var))
            .find(|key| !key.trim().is_empty())
            .or_else(|| self.api_key.clone().filter(|k| !k.trim().is_empty()))
    }

    /// Model: command line, then `GEMINI_MODEL`, then config, then the default
    pub fn resolve_model(&self, cli_model: Option<&str>) -> String {
        self.resolve_model_with(cli_model, |var| std::env::var(var).ok())
    }

    pub fn resolve_model_with<F>(&self, cli_model: Option<&str>, env: F) -> String
    where
        F: Fn(&str) -> Option<String>,
    {
        cli_model
            .map(str::to_string)
            .or_else(|| env("GEMINI_MODEL"))
            .or_else(|| self.model.clone())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string())
    }

    pub fn resolve_base_url(&self) -> String {
        std::env::var("GEMINI_BASE_URL")
            .ok()
            .or_else(|| self.base_url.clone())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
    }

    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("sparknomad"))
    }

    fn get_config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.json"))
    }
}
