//! Order domain models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::cart::{Cart, CartItem};
use crate::config::CheckoutSettings;
use crate::error::{Result, ValidationError};
use crate::user::UserSession;

/// How the customer receives the order.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum DeliveryMode {
    #[default]
    Delivery,
    Pickup,
}

/// Order progress. Strictly linear: pending, preparing, ready, delivered.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Preparing,
    Ready,
    Delivered,
}

impl OrderStatus {
    /// The four steps in order.
    pub const STEPS: [OrderStatus; 4] = [
        OrderStatus::Pending,
        OrderStatus::Preparing,
        OrderStatus::Ready,
        OrderStatus::Delivered,
    ];

    /// Zero-based position in [`STEPS`](Self::STEPS).
    pub fn step_index(self) -> usize {
        self as usize
    }

    /// Customer-facing text. The last two steps read differently for pickup.
    pub fn label(self, mode: DeliveryMode) -> &'static str {
        match (self, mode) {
            (OrderStatus::Pending, _) => "Order Received",
            (OrderStatus::Preparing, _) => "Being Prepared",
            (OrderStatus::Ready, DeliveryMode::Delivery) => "Out for Delivery",
            (OrderStatus::Ready, DeliveryMode::Pickup) => "Ready for Pickup",
            (OrderStatus::Delivered, DeliveryMode::Delivery) => "Delivered",
            (OrderStatus::Delivered, DeliveryMode::Pickup) => "Picked Up",
        }
    }
}

/// A status and when it was reached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusEntry {
    pub status: OrderStatus,
    pub timestamp: DateTime<Utc>,
}

/// Snapshot of a cart line at checkout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: String,
    pub name: String,
    pub quantity: u32,
    pub price: Decimal,
    pub chef_name: String,
    #[serde(default)]
    pub chef_id: String,
}

impl OrderItem {
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

impl From<&CartItem> for OrderItem {
    fn from(item: &CartItem) -> Self {
        Self {
            id: item.id.clone(),
            name: item.name.clone(),
            quantity: item.quantity,
            price: item.price,
            chef_name: item.chef_name.clone(),
            chef_id: item.chef_id.clone(),
        }
    }
}

/// Price breakdown shown at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderTotals {
    pub subtotal: Decimal,
    pub delivery_fee: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}

impl OrderTotals {
    /// Subtotal plus the delivery fee (delivery only) plus GST on the
    /// subtotal. Tax is rounded to paise.
    pub fn compute(subtotal: Decimal, mode: DeliveryMode, settings: &CheckoutSettings) -> Self {
        let delivery_fee = match mode {
            DeliveryMode::Delivery => settings.delivery_fee,
            DeliveryMode::Pickup => Decimal::ZERO,
        };
        let tax = (subtotal * settings.gst_rate).round_dp(2);
        Self {
            subtotal,
            delivery_fee,
            tax,
            total: subtotal + delivery_fee + tax,
        }
    }
}

/// What the customer fills in on the checkout form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutRequest {
    pub mode: DeliveryMode,
    pub address: Option<String>,
    pub phone: String,
}

impl CheckoutRequest {
    /// Checks the form against `cart`, reporting the first problem found:
    /// empty cart, then missing address (delivery only), then missing phone.
    pub fn validate(&self, cart: &Cart) -> Result<()> {
        if cart.is_empty() {
            return Err(ValidationError::EmptyCart.into());
        }
        if self.mode == DeliveryMode::Delivery && self.delivery_address().is_none() {
            return Err(ValidationError::MissingAddress.into());
        }
        if self.phone.trim().is_empty() {
            return Err(ValidationError::MissingPhone.into());
        }
        Ok(())
    }

    /// Trimmed, non-blank address.
    pub fn delivery_address(&self) -> Option<&str> {
        self.address
            .as_deref()
            .map(str::trim)
            .filter(|a| !a.is_empty())
    }
}

/// A placed order.
///
/// The status history is only ever appended to by whatever service tracks
/// fulfilment; nothing in this workspace advances it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    #[serde(default)]
    pub customer_id: String,
    #[serde(default)]
    pub customer_name: String,
    pub items: Vec<OrderItem>,
    pub totals: OrderTotals,
    pub delivery_mode: DeliveryMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    pub phone: String,
    pub created_at: DateTime<Utc>,
    pub status_history: Vec<StatusEntry>,
}

impl Order {
    /// Builds a pending order from a validated cart and form.
    pub fn place(
        id: String,
        customer: &UserSession,
        cart: &Cart,
        request: &CheckoutRequest,
        settings: &CheckoutSettings,
        now: DateTime<Utc>,
    ) -> Self {
        let address = match request.mode {
            DeliveryMode::Delivery => request.delivery_address().map(str::to_string),
            DeliveryMode::Pickup => None,
        };
        Self {
            id,
            customer_id: customer.id.clone(),
            customer_name: customer.name.clone(),
            items: cart.items().iter().map(OrderItem::from).collect(),
            totals: OrderTotals::compute(cart.total(), request.mode, settings),
            delivery_mode: request.mode,
            address,
            phone: request.phone.trim().to_string(),
            created_at: now,
            status_history: vec![StatusEntry {
                status: OrderStatus::Pending,
                timestamp: now,
            }],
        }
    }

    /// Latest status in the history, pending if the history is empty.
    pub fn current_status(&self) -> OrderStatus {
        self.status_history
            .last()
            .map(|entry| entry.status)
            .unwrap_or_default()
    }

    /// Whether any line was cooked by `chef_id`.
    pub fn includes_chef(&self, chef_id: &str) -> bool {
        self.items.iter().any(|item| item.chef_id == chef_id)
    }

    pub fn status_label(&self) -> &'static str {
        self.current_status().label(self.delivery_mode)
    }
}
