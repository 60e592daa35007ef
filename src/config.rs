//! Configuration handling for td
//!
//! Configuration is read from `~/.config/td/config.toml` (platform config
//! directory) and may be overridden by environment variables:
//!
//! | Variable | Overrides |
//! |----------|-----------|
//! | `TODOIST_API_TOKEN` | `api_token` |
//! | `TD_BASE_URL` | `base_url` |

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::api::DEFAULT_BASE_URL;
use crate::cli::OutputFormat;

pub const TOKEN_ENV: &str = "TODOIST_API_TOKEN";
pub const BASE_URL_ENV: &str = "TD_BASE_URL";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("No API token configured.")]
    MissingToken { path: Option<PathBuf> },

    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

impl ConfigError {
    pub fn code(&self) -> &'static str {
        match self {
            ConfigError::MissingToken { .. } => "NO_TOKEN",
            ConfigError::Parse(_) => "INVALID_CONFIG",
        }
    }

    pub fn hints(&self) -> Vec<String> {
        match self {
            ConfigError::MissingToken { path } => {
                let mut hints = vec![format!("Set {} in your environment", TOKEN_ENV)];
                if let Some(path) = path {
                    hints.push(format!("or add api_token = \"...\" to {}", path.display()));
                }
                hints
            }
            ConfigError::Parse(_) => Vec::new(),
        }
    }
}

/// User configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Personal API token
    pub api_token: Option<String>,

    /// REST API root
    pub base_url: String,

    /// Output format when no flag is given
    pub default_format: OutputFormat,

    /// Show progress spinners on interactive terminals
    pub spinner: bool,

    #[serde(skip)]
    path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_token: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            default_format: OutputFormat::Text,
            spinner: true,
            path: None,
        }
    }
}

impl Config {
    /// Loads configuration from the default location and the environment
    pub fn load() -> Result<Self> {
        let mut config = match Self::config_path() {
            Some(path) => Self::load_from(&path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Returns the path of the config file, if a home directory is known
    pub fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "todoist", "td").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Loads configuration from a specific file. A missing file yields the
    /// defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config: {}", path.display()))?;

            toml::from_str::<Config>(&content)
                .map_err(|e| ConfigError::Parse(e.to_string()))
                .with_context(|| format!("Failed to parse config: {}", path.display()))?
        } else {
            Self::default()
        };

        config.path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Applies environment overrides. Empty values are ignored.
    pub fn apply_env(&mut self, env: impl Fn(&str) -> Option<String>) {
        let non_empty = |key: &str| env(key).filter(|v| !v.trim().is_empty());

        if let Some(token) = non_empty(TOKEN_ENV) {
            self.api_token = Some(token);
        }
        if let Some(url) = non_empty(BASE_URL_ENV) {
            self.base_url = url;
        }
    }

    /// The API token, or an error explaining where to put one
    pub fn token(&self) -> Result<&str, ConfigError> {
        self.api_token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ConfigError::MissingToken { path: self.path.clone() })
    }
}
