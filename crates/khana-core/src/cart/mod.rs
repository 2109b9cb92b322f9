//! Cart state: the current customer's pending selection.
//!
//! The cart is a plain value with no persistence of its own; hosts that
//! want it to survive a restart serialize it themselves.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ValidationError};
use crate::meal::Meal;

/// One meal in the cart with its quantity.
///
/// `price` is a snapshot taken when the meal was added; later catalog price
/// changes do not affect it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub id: String,
    pub name: String,
    pub price: Decimal,
    pub image: String,
    pub chef_name: String,
    /// Missing in carts stored before chef ids were recorded
    #[serde(default)]
    pub chef_id: String,
    pub quantity: u32,
}

impl CartItem {
    pub fn from_meal(meal: &Meal) -> Self {
        Self {
            id: meal.id.clone(),
            name: meal.name.clone(),
            price: meal.price,
            image: meal.image.clone(),
            chef_name: meal.chef_name.clone(),
            chef_id: meal.chef_id.clone(),
            quantity: 1,
        }
    }

    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// Line items keyed by meal id, in insertion order.
///
/// Every line has a quantity of at least 1.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a cart from stored lines, dropping any with quantity 0.
    pub fn from_items(items: Vec<CartItem>) -> Self {
        Self {
            items: items.into_iter().filter(|i| i.quantity >= 1).collect(),
        }
    }

    /// Adds one unit of `item`.
    ///
    /// An existing line with the same id gets its quantity incremented;
    /// otherwise `item` is appended with quantity 1. The incoming quantity is
    /// ignored. A line already at `u32::MAX` is left as is and
    /// `QuantityTooLarge` is returned.
    pub fn add_item(&mut self, item: CartItem) -> Result<()> {
        match self.items.iter_mut().find(|i| i.id == item.id) {
            Some(existing) => {
                existing.quantity = existing
                    .quantity
                    .checked_add(1)
                    .ok_or(ValidationError::QuantityTooLarge)?;
            }
            None => self.items.push(CartItem { quantity: 1, ..item }),
        }
        Ok(())
    }

    /// Sets the quantity of `id`. A quantity below 1 removes the line.
    ///
    /// Returns false if no line has that id.
    pub fn update_quantity(&mut self, id: &str, quantity: u32) -> bool {
        if quantity < 1 {
            return self.remove_item(id);
        }
        match self.items.iter_mut().find(|i| i.id == id) {
            Some(item) => {
                item.quantity = quantity;
                true
            }
            None => false,
        }
    }

    /// Removes the line for `id`. Returns false if there was none.
    pub fn remove_item(&mut self, id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|i| i.id != id);
        self.items.len() != before
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Sum of price × quantity over all lines, computed on every call.
    pub fn total(&self) -> Decimal {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Total number of units across all lines.
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn get(&self, id: &str) -> Option<&CartItem> {
        self.items.iter().find(|i| i.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }
}
