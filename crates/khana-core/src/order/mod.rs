//! Order domain module.
//!
//! # Module Structure
//!
//! - `model`: orders, status sequence, pricing and the checkout form
//! - `service`: the order service collaborator
//! - `stats`: sales figures for the chef and admin dashboards

mod model;
mod service;
mod stats;

pub use model::{
    CheckoutRequest, DeliveryMode, Order, OrderItem, OrderStatus, OrderTotals, StatusEntry,
};
pub use service::OrderService;
pub use stats::SalesSummary;
