//! Infrastructure for the Khana storefront: file-backed durable storage,
//! configuration loading and the local order book.

pub mod config_service;
pub mod order_book;
pub mod paths;
pub mod storage;

pub use crate::config_service::ConfigService;
pub use crate::order_book::LocalOrderBook;
pub use crate::paths::KhanaPaths;
pub use crate::storage::FileStore;
