//! Directory-backed durable store.
//!
//! Each key is kept in its own `<key>.json` file inside one directory, so the
//! session, catalog, cart and order records can be inspected and removed
//! independently.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use khana_core::error::{KhanaError, Result};
use khana_core::storage::{DurableStore, UpdateFn};

use super::atomic_file::AtomicFile;

/// [`DurableStore`] that writes one file per key.
///
/// File I/O runs on the blocking pool so callers on the async runtime are
/// never stalled by fsync.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Creates a store rooted at `dir`. The directory is created lazily on
    /// the first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file holding `key`.
    pub fn path_for(&self, key: &str) -> Result<PathBuf> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{key}.json")))
    }

    fn file_for(&self, key: &str) -> Result<AtomicFile> {
        Ok(AtomicFile::new(self.path_for(key)?))
    }
}

/// Keys become file names, so only a conservative character set is allowed.
fn validate_key(key: &str) -> Result<()> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(KhanaError::config(format!("Invalid storage key: '{key}'")))
    }
}

async fn run_blocking<T, F>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| KhanaError::internal(format!("Failed to join task: {}", e)))?
}

#[async_trait]
impl DurableStore for FileStore {
    async fn load(&self, key: &str) -> Result<Option<String>> {
        let file = self.file_for(key)?;
        run_blocking(move || Ok(file.load()?)).await
    }

    async fn save(&self, key: &str, value: &str) -> Result<()> {
        let file = self.file_for(key)?;
        let value = value.to_string();
        tracing::trace!(path = %file.path().display(), bytes = value.len(), "Writing record");
        run_blocking(move || Ok(file.save(&value)?)).await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let file = self.file_for(key)?;
        run_blocking(move || Ok(file.remove()?)).await
    }

    /// Runs `f` while holding the record's file lock, so other stores on
    /// the same directory (in this process or another) cannot interleave.
    async fn update(&self, key: &str, f: UpdateFn) -> Result<()> {
        let file = self.file_for(key)?;
        run_blocking(move || file.update(f)).await
    }
}
