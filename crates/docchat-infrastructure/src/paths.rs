//! Path management for docchat configuration and logs.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/docchat/           # Config directory
//! ├── config.toml              # Application configuration
//! └── logs/                    # Application logs
//!     └── docchat.log.YYYY-MM-DD
//! ```

use std::path::PathBuf;

use docchat_core::error::{DocchatError, Result};

const APP_DIR: &str = "docchat";

/// Resolves where docchat keeps its files.
pub struct DocchatPaths;

impl DocchatPaths {
    /// Returns the docchat configuration directory (e.g. `~/.config/docchat/`).
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or_else(|| DocchatError::config("Cannot find config directory"))
    }

    /// Returns the path of `config.toml`.
    pub fn config_file() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Returns the log directory.
    pub fn log_dir() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("logs"))
    }
}
