//! Application layer for the Khana storefront.
//!
//! [`Storefront`] wires the domain holders together behind the access
//! policy. [`CheckoutUseCase`], [`ChefDesk`] and [`AdminDesk`] hold the
//! multi-step flows.

pub mod admin_desk;
pub mod checkout;
pub mod chef_desk;
pub mod storefront;

pub use admin_desk::{AdminDesk, PlatformStats};
pub use checkout::{CheckoutUseCase, generate_order_id};
pub use chef_desk::{ChefDesk, MealForm};
pub use storefront::{Storefront, StorefrontBuilder};
