//! Unified path management for khana configuration and data files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/khana/             # Config directory
//! └── config.toml              # Storefront configuration
//!
//! ~/.local/share/khana/        # Data directory (durable client storage)
//! ├── user.json                # Current session
//! ├── allMeals.json            # Catalog snapshot
//! ├── cart.json                # Cart lines kept by the CLI
//! └── orders.json              # Locally recorded orders
//! ```

use std::path::PathBuf;

use khana_core::config::StorefrontConfig;

/// Environment variable that overrides the data directory.
pub const DATA_DIR_ENV: &str = "KHANA_DATA_DIR";

const APP_DIR: &str = "khana";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Home directory could not be determined.
    HomeDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Cannot find home directory"),
        }
    }
}

impl std::error::Error for PathError {}

impl From<PathError> for khana_core::KhanaError {
    fn from(e: PathError) -> Self {
        khana_core::KhanaError::config(e.to_string())
    }
}

/// Platform-specific locations for khana files.
pub struct KhanaPaths;

impl KhanaPaths {
    /// Returns the khana configuration directory (e.g. `~/.config/khana/`).
    pub fn config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or(PathError::HomeDirNotFound)
    }

    /// Returns the platform data directory for khana (e.g. `~/.local/share/khana/`).
    pub fn data_dir() -> Result<PathBuf, PathError> {
        dirs::data_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or(PathError::HomeDirNotFound)
    }

    /// Returns the path to `config.toml`.
    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Picks the directory for durable records.
    ///
    /// Precedence: explicit override, then `KHANA_DATA_DIR`, then the
    /// `[storage] data_dir` setting, then the platform data directory.
    pub fn resolve_data_dir(
        explicit: Option<PathBuf>,
        config: &StorefrontConfig,
    ) -> Result<PathBuf, PathError> {
        if let Some(dir) = explicit {
            return Ok(dir);
        }
        if let Some(dir) = std::env::var_os(DATA_DIR_ENV).filter(|v| !v.is_empty()) {
            return Ok(PathBuf::from(dir));
        }
        if let Some(dir) = config.storage.data_dir.clone() {
            return Ok(dir);
        }
        Self::data_dir()
    }
}
