//! Local stand-in for the order service.
//!
//! Records placed orders in durable storage so they can be looked up again.
//! It never advances an order's status.

use std::sync::Arc;

use async_trait::async_trait;
use khana_core::error::Result;
use khana_core::order::{Order, OrderService};
use khana_core::storage::{self, DurableStore, ORDERS_KEY};

/// [`OrderService`] that keeps every submitted order under the `orders` key.
///
/// Appends go through [`DurableStore::update`], so two books over the same
/// store never drop each other's orders.
pub struct LocalOrderBook {
    store: Arc<dyn DurableStore>,
}

impl LocalOrderBook {
    pub fn new(store: Arc<dyn DurableStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl OrderService for LocalOrderBook {
    async fn submit(&self, order: Order) -> Result<()> {
        let order_id = order.id.clone();
        let total = order.totals.total;

        storage::update_json(self.store.as_ref(), ORDERS_KEY, move |orders: Option<Vec<Order>>| {
            let mut orders = orders.unwrap_or_default();
            orders.push(order);
            orders
        })
        .await?;

        tracing::info!(order_id = %order_id, total = %total, "Order recorded");
        Ok(())
    }

    async fn find(&self, order_id: &str) -> Result<Option<Order>> {
        Ok(self.list().await?.into_iter().find(|o| o.id == order_id))
    }

    /// A malformed record reads as no orders.
    async fn list(&self) -> Result<Vec<Order>> {
        Ok(storage::load_json_or_none(self.store.as_ref(), ORDERS_KEY)
            .await
            .unwrap_or_default())
    }
}
