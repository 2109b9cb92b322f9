//! User identity domain module.
//!
//! # Module Structure
//!
//! - `model`: Role and session identity models
//!
//! # Usage
//!
//! ```ignore
//! use khana_core::user::{Role, UserSession};
//! ```

mod model;

// Re-export public API
pub use model::{Role, UserSession};
