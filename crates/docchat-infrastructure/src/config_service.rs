//! Configuration service implementation.
//!
//! Loads `AppConfig` from `~/.config/docchat/config.toml`. A missing or
//! empty file means defaults; `DOCCHAT_SERVER_URL` overrides the server URL.

use std::fs;
use std::path::{Path, PathBuf};

use docchat_core::config::AppConfig;
use docchat_core::error::{DocchatError, Result};

use crate::paths::DocchatPaths;

pub const SERVER_URL_ENV: &str = "DOCCHAT_SERVER_URL";

/// Reads and validates the application configuration.
#[derive(Debug, Clone)]
pub struct ConfigService {
    path: PathBuf,
}

impl ConfigService {
    /// Uses the default config file location.
    pub fn new() -> Result<Self> {
        Ok(Self::with_path(DocchatPaths::config_file()?))
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the file, applies the environment override and validates.
    pub fn load(&self) -> Result<AppConfig> {
        let mut config = self.load_file()?;

        if let Ok(url) = std::env::var(SERVER_URL_ENV) {
            if !url.trim().is_empty() {
                tracing::debug!("Server URL overridden by {}", SERVER_URL_ENV);
                config.server.base_url = url.trim().to_string();
            }
        }

        config.validate()?;
        Ok(config)
    }

    fn load_file(&self) -> Result<AppConfig> {
        if !self.path.exists() {
            tracing::debug!("No config file at {}, using defaults", self.path.display());
            return Ok(AppConfig::default());
        }

        let content = fs::read_to_string(&self.path).map_err(|e| {
            DocchatError::io(format!(
                "Failed to read configuration file at {}: {}",
                self.path.display(),
                e
            ))
        })?;

        if content.trim().is_empty() {
            return Ok(AppConfig::default());
        }

        Ok(toml::from_str(&content)?)
    }
}
