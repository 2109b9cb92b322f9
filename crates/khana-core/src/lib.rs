//! Domain layer for the Khana storefront.
//!
//! Three state holders make up the client state:
//!
//! - [`session::SessionState`]: who is logged in
//! - [`meal::Catalog`]: every chef's meal listings
//! - [`cart::Cart`]: the customer's pending selection
//!
//! Session and catalog persist through an injected [`storage::DurableStore`].

pub mod access;
pub mod cart;
pub mod config;
pub mod error;
pub mod meal;
pub mod order;
pub mod session;
pub mod storage;
pub mod user;

// Re-export common error type
pub use error::{KhanaError, Result, ValidationError};
