//! Sales figures derived from placed orders.

use rust_decimal::Decimal;

use super::model::Order;

/// Order count, units sold and revenue over a set of orders.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SalesSummary {
    pub orders: usize,
    pub units: u64,
    pub revenue: Decimal,
}

impl SalesSummary {
    /// Figures for the whole platform.
    ///
    /// Revenue is what customers paid, delivery fees and GST included.
    pub fn platform(orders: &[Order]) -> Self {
        orders.iter().fold(Self::default(), |mut acc, order| {
            acc.orders += 1;
            acc.units += order
                .items
                .iter()
                .map(|item| u64::from(item.quantity))
                .sum::<u64>();
            acc.revenue += order.totals.total;
            acc
        })
    }

    /// Figures for one chef.
    ///
    /// Only that chef's lines count and revenue is their line totals. An
    /// order holding several of the chef's meals counts once.
    pub fn for_chef(orders: &[Order], chef_id: &str) -> Self {
        orders
            .iter()
            .filter(|order| order.includes_chef(chef_id))
            .fold(Self::default(), |mut acc, order| {
                acc.orders += 1;
                for item in order.items.iter().filter(|item| item.chef_id == chef_id) {
                    acc.units += u64::from(item.quantity);
                    acc.revenue += item.line_total();
                }
                acc
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::{Cart, CartItem};
    use crate::config::CheckoutSettings;
    use crate::order::{CheckoutRequest, DeliveryMode};
    use crate::user::{Role, UserSession};
    use chrono::Utc;

    fn line(id: &str, chef_id: &str, price: i64) -> CartItem {
        CartItem {
            id: id.to_string(),
            name: id.to_string(),
            price: Decimal::from(price),
            image: String::new(),
            chef_name: format!("Chef {chef_id}"),
            chef_id: chef_id.to_string(),
            quantity: 1,
        }
    }

    fn order(lines: &[(CartItem, u32)]) -> Order {
        let mut cart = Cart::new();
        for (item, quantity) in lines {
            cart.add_item(item.clone()).unwrap();
            cart.update_quantity(&item.id, *quantity);
        }
        Order::place(
            "o".to_string(),
            &UserSession::synthesize("Asha", "asha@example.com", Role::Customer, None),
            &cart,
            &CheckoutRequest {
                mode: DeliveryMode::Pickup,
                address: None,
                phone: "1".to_string(),
            },
            &CheckoutSettings::default(),
            Utc::now(),
        )
    }

    #[test]
    fn test_platform_counts_everything_paid() {
        let orders = vec![
            order(&[(line("dal", "c1", 100), 1)]),
            order(&[(line("dal", "c1", 100), 2), (line("dosa", "c2", 50), 1)]),
        ];
        let summary = SalesSummary::platform(&orders);

        assert_eq!(summary.orders, 2);
        assert_eq!(summary.units, 4);
        // 118 + 295 (250 plus 18% GST, pickup)
        assert_eq!(summary.revenue, Decimal::from(413));
    }

    #[test]
    fn test_chef_counts_only_own_lines() {
        let orders = vec![
            order(&[(line("dal", "c1", 100), 1)]),
            order(&[(line("dal", "c1", 100), 2), (line("dosa", "c2", 50), 3)]),
            order(&[(line("dosa", "c2", 50), 1)]),
        ];

        let c1 = SalesSummary::for_chef(&orders, "c1");
        assert_eq!(c1.orders, 2);
        assert_eq!(c1.units, 3);
        assert_eq!(c1.revenue, Decimal::from(300));

        let c2 = SalesSummary::for_chef(&orders, "c2");
        assert_eq!(c2.orders, 2);
        assert_eq!(c2.revenue, Decimal::from(200));

        assert_eq!(SalesSummary::for_chef(&orders, "c3"), SalesSummary::default());
    }
}
