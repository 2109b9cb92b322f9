//! Storage layer for atomic file operations.

mod atomic_file;
mod file_store;

pub use atomic_file::{AtomicFile, AtomicFileError};
pub use file_store::FileStore;
