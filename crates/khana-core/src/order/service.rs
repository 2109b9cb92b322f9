//! Order service trait.
//!
//! Fulfilment tracking belongs to an external order service. The storefront
//! only hands placed orders over and reads them back.

use async_trait::async_trait;

use super::model::Order;
use crate::error::Result;

/// An abstract order service.
///
/// Implementations own the status history. The storefront never advances
/// an order past the status it was placed with.
#[async_trait]
pub trait OrderService: Send + Sync {
    /// Accepts a newly placed order.
    async fn submit(&self, order: Order) -> Result<()>;

    /// Looks up an order by id.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(order))`: The order is known
    /// - `Ok(None)`: No order with that id
    /// - `Err(KhanaError)`: The service could not be reached
    async fn find(&self, order_id: &str) -> Result<Option<Order>>;

    /// Every order the service knows about, oldest first.
    async fn list(&self) -> Result<Vec<Order>>;
}
