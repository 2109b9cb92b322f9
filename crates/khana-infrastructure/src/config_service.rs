//! Loads and writes `config.toml`.

use std::path::{Path, PathBuf};

use khana_core::config::StorefrontConfig;
use khana_core::error::Result;

use crate::paths::KhanaPaths;
use crate::storage::AtomicFile;

/// Reads the storefront configuration from a TOML file.
///
/// # Example
///
/// ```no_run
/// use khana_infrastructure::config_service::ConfigService;
///
/// # fn main() -> khana_core::Result<()> {
/// let service = ConfigService::new()?;
/// let config = service.load()?;
/// println!("Delivery fee: {}", config.checkout.delivery_fee);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ConfigService {
    file: AtomicFile,
}

impl ConfigService {
    /// Uses the platform config file (`~/.config/khana/config.toml`).
    pub fn new() -> Result<Self> {
        Ok(Self::with_path(KhanaPaths::config_file()?))
    }

    pub fn with_path(path: PathBuf) -> Self {
        Self {
            file: AtomicFile::new(path),
        }
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Loads the configuration.
    ///
    /// A missing file yields the defaults; a malformed one is an error so a
    /// typo is never silently ignored.
    pub fn load(&self) -> Result<StorefrontConfig> {
        match self.file.load()? {
            Some(content) => {
                let config = StorefrontConfig::from_toml_str(&content)?;
                tracing::debug!(path = %self.path().display(), "Loaded configuration");
                Ok(config)
            }
            None => {
                tracing::debug!(path = %self.path().display(), "No config file, using defaults");
                Ok(StorefrontConfig::default())
            }
        }
    }

    /// Writes `config` to the file, replacing what was there.
    pub fn save(&self, config: &StorefrontConfig) -> Result<()> {
        let content = config.to_toml_string()?;
        self.file.save(&content)?;
        Ok(())
    }

    /// Writes the defaults unless a file already exists.
    ///
    /// Returns true if a file was created.
    pub fn init_default(&self) -> Result<bool> {
        if self.file.load()?.is_some() {
            return Ok(false);
        }
        self.save(&StorefrontConfig::default())?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let service = ConfigService::with_path(temp_dir.path().join("config.toml"));
        assert_eq!(service.load().unwrap(), StorefrontConfig::default());
    }

    #[test]
    fn test_malformed_file_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[checkout\ndelivery_fee = ").unwrap();

        let err = ConfigService::with_path(path).load().unwrap_err();
        assert!(err.is_serialization());
    }

    #[test]
    fn test_init_default_does_not_overwrite() {
        let temp_dir = TempDir::new().unwrap();
        let service = ConfigService::with_path(temp_dir.path().join("config.toml"));

        assert!(service.init_default().unwrap());

        let mut custom = StorefrontConfig::default();
        custom.session.simulated_latency_ms = 0;
        service.save(&custom).unwrap();

        assert!(!service.init_default().unwrap());
        assert_eq!(service.load().unwrap().session.simulated_latency_ms, 0);
    }
}
