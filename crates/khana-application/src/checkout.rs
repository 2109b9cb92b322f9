//! Checkout use case.
//!
//! Turns the current cart into an order, hands it to the order service and
//! empties the cart.

use std::sync::Arc;

use chrono::Utc;
use khana_core::cart::Cart;
use khana_core::config::CheckoutSettings;
use khana_core::error::Result;
use khana_core::order::{CheckoutRequest, DeliveryMode, Order, OrderService, OrderTotals};
use khana_core::user::UserSession;
use rand::Rng;

const ORDER_ID_LEN: usize = 9;
const ORDER_ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Places orders against an [`OrderService`].
pub struct CheckoutUseCase {
    orders: Arc<dyn OrderService>,
    settings: CheckoutSettings,
}

impl CheckoutUseCase {
    pub fn new(orders: Arc<dyn OrderService>, settings: CheckoutSettings) -> Self {
        Self { orders, settings }
    }

    /// Price breakdown for `cart` if fulfilled by `mode`.
    pub fn quote(&self, cart: &Cart, mode: DeliveryMode) -> OrderTotals {
        OrderTotals::compute(cart.total(), mode, &self.settings)
    }

    /// Validates the form, submits the order and clears the cart.
    ///
    /// The cart is left untouched if validation or submission fails.
    pub async fn place_order(
        &self,
        cart: &mut Cart,
        customer: &UserSession,
        request: &CheckoutRequest,
    ) -> Result<Order> {
        request.validate(cart)?;

        let order = Order::place(
            generate_order_id(),
            customer,
            cart,
            request,
            &self.settings,
            Utc::now(),
        );
        self.orders.submit(order.clone()).await?;
        cart.clear();

        tracing::info!(
            order_id = %order.id,
            customer_id = %order.customer_id,
            items = order.items.len(),
            total = %order.totals.total,
            mode = %order.delivery_mode,
            "Order placed"
        );
        Ok(order)
    }

    /// Looks an order up through the order service.
    pub async fn find_order(&self, order_id: &str) -> Result<Option<Order>> {
        self.orders.find(order_id).await
    }
}

/// Nine random lowercase alphanumerics.
pub fn generate_order_id() -> String {
    let mut rng = rand::thread_rng();
    (0..ORDER_ID_LEN)
        .map(|_| ORDER_ID_ALPHABET[rng.gen_range(0..ORDER_ID_ALPHABET.len())] as char)
        .collect()
}
