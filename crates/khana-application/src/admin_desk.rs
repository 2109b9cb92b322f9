//! Admin dashboard operations.
//!
//! An [`AdminDesk`] sees the whole catalog and every order. It moderates
//! listings and reports platform-wide figures.

use std::collections::HashSet;

use khana_core::error::{KhanaError, Result};
use khana_core::meal::{Approval, Catalog, Meal};
use khana_core::order::{Order, OrderService, SalesSummary};
use khana_core::user::UserSession;

/// Platform-wide counts for the admin dashboard.
///
/// There is no user registry, so customers and chefs are counted from the
/// ids seen on orders and listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlatformStats {
    /// Distinct customers who placed at least one order
    pub customers: usize,
    /// Distinct chefs with at least one listing
    pub chefs: usize,
    pub meals: usize,
    pub rejected_meals: usize,
    pub sales: SalesSummary,
}

pub struct AdminDesk<'a> {
    catalog: &'a Catalog,
    orders: &'a dyn OrderService,
    admin: UserSession,
}

impl std::fmt::Debug for AdminDesk<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminDesk")
            .field("admin", &self.admin)
            .finish_non_exhaustive()
    }
}

impl<'a> AdminDesk<'a> {
    /// Binds a desk to `admin`. Callers check the role beforehand.
    pub(crate) fn new(catalog: &'a Catalog, orders: &'a dyn OrderService, admin: UserSession) -> Self {
        Self {
            catalog,
            orders,
            admin,
        }
    }

    pub fn admin(&self) -> &UserSession {
        &self.admin
    }

    /// Every listing, rejected and unavailable ones included.
    pub async fn meals(&self) -> Vec<Meal> {
        self.catalog.meals().await
    }

    /// Every order, newest first.
    pub async fn orders(&self) -> Result<Vec<Order>> {
        let mut orders = self.orders.list().await?;
        orders.reverse();
        Ok(orders)
    }

    /// Makes a rejected listing visible to customers again.
    pub async fn approve_meal(&self, meal_id: &str) -> Result<Meal> {
        self.moderate(meal_id, Approval::Approved).await
    }

    /// Hides a listing from customers whatever its availability.
    pub async fn reject_meal(&self, meal_id: &str) -> Result<Meal> {
        self.moderate(meal_id, Approval::Rejected).await
    }

    pub async fn stats(&self) -> Result<PlatformStats> {
        let meals = self.catalog.meals().await;
        let orders = self.orders.list().await?;

        let customers: HashSet<&str> = orders
            .iter()
            .map(|o| o.customer_id.as_str())
            .filter(|id| !id.is_empty())
            .collect();
        let chefs: HashSet<&str> = meals.iter().map(|m| m.chef_id.as_str()).collect();

        Ok(PlatformStats {
            customers: customers.len(),
            chefs: chefs.len(),
            meals: meals.len(),
            rejected_meals: meals
                .iter()
                .filter(|m| m.approval == Approval::Rejected)
                .count(),
            sales: SalesSummary::platform(&orders),
        })
    }

    async fn moderate(&self, meal_id: &str, approval: Approval) -> Result<Meal> {
        let meal = self
            .catalog
            .set_approval(meal_id, approval)
            .await
            .ok_or_else(|| KhanaError::not_found("meal", meal_id))?;
        tracing::info!(meal_id, %approval, admin = %self.admin.email, "Listing moderated");
        Ok(meal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use khana_core::cart::{Cart, CartItem};
    use khana_core::config::{CatalogSettings, CheckoutSettings};
    use khana_core::meal::{Cuisine, Location, MealQuery, NewMeal};
    use khana_core::order::{CheckoutRequest, DeliveryMode};
    use khana_core::storage::MemoryStore;
    use khana_core::user::Role;
    use khana_infrastructure::LocalOrderBook;
    use rust_decimal::Decimal;
    use std::sync::Arc;

    fn admin() -> UserSession {
        UserSession::synthesize("Ops", "ops@example.com", Role::Admin, None)
    }

    fn new_meal(name: &str, chef_id: &str, price: i64) -> NewMeal {
        NewMeal {
            name: name.to_string(),
            description: "House special".to_string(),
            price: Decimal::from(price),
            image: String::new(),
            chef_name: "Chef".to_string(),
            chef_id: chef_id.to_string(),
            cuisine: Cuisine::SouthIndian,
            prep_time: "20 mins".to_string(),
            available: true,
            location: Location::Chennai,
        }
    }

    fn order_by(id: &str, email: &str, meal: &Meal, quantity: u32) -> Order {
        let mut cart = Cart::new();
        cart.add_item(CartItem::from_meal(meal)).unwrap();
        cart.update_quantity(&meal.id, quantity);
        Order::place(
            id.to_string(),
            &UserSession::synthesize("Customer", email, Role::Customer, None),
            &cart,
            &CheckoutRequest {
                mode: DeliveryMode::Pickup,
                address: None,
                phone: "98765 43210".to_string(),
            },
            &CheckoutSettings::default(),
            Utc::now(),
        )
    }

    async fn setup() -> (Catalog, LocalOrderBook) {
        let store = Arc::new(MemoryStore::new());
        let catalog = Catalog::open(store.clone(), CatalogSettings::default()).await;
        (catalog, LocalOrderBook::new(store))
    }

    #[tokio::test]
    async fn test_reject_hides_meal_until_approved() {
        let (catalog, orders) = setup().await;
        let desk = AdminDesk::new(&catalog, &orders, admin());
        let meal = catalog.add_meal(new_meal("Dosa", "c1", 80)).await.unwrap();

        let rejected = desk.reject_meal(&meal.id).await.unwrap();
        assert_eq!(rejected.approval, Approval::Rejected);
        assert!(catalog.browse(&MealQuery::default()).await.is_empty());
        assert_eq!(desk.meals().await.len(), 1);

        desk.approve_meal(&meal.id).await.unwrap();
        assert_eq!(catalog.browse(&MealQuery::default()).await.len(), 1);

        assert!(desk.reject_meal("missing").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_stats_span_the_platform() {
        let (catalog, orders) = setup().await;
        let desk = AdminDesk::new(&catalog, &orders, admin());
        let dosa = catalog.add_meal(new_meal("Dosa", "c1", 80)).await.unwrap();
        let idli = catalog.add_meal(new_meal("Idli", "c1", 40)).await.unwrap();
        catalog.add_meal(new_meal("Poha", "c2", 50)).await.unwrap();
        desk.reject_meal(&idli.id).await.unwrap();

        orders
            .submit(order_by("aaa", "asha@example.com", &dosa, 2))
            .await
            .unwrap();
        orders
            .submit(order_by("bbb", "asha@example.com", &dosa, 1))
            .await
            .unwrap();
        orders
            .submit(order_by("ccc", "ravi@example.com", &dosa, 1))
            .await
            .unwrap();

        let stats = desk.stats().await.unwrap();
        assert_eq!(stats.customers, 2);
        assert_eq!(stats.chefs, 2);
        assert_eq!(stats.meals, 3);
        assert_eq!(stats.rejected_meals, 1);
        assert_eq!(stats.sales.orders, 3);
        assert_eq!(stats.sales.units, 4);
        // Pickup totals: subtotal plus 18% GST
        assert_eq!(stats.sales.revenue, Decimal::new(37760, 2));

        let ids: Vec<_> = desk.orders().await.unwrap().into_iter().map(|o| o.id).collect();
        assert_eq!(ids, ["ccc", "bbb", "aaa"]);
    }

    #[tokio::test]
    async fn test_stats_on_empty_platform() {
        let (catalog, orders) = setup().await;
        let desk = AdminDesk::new(&catalog, &orders, admin());
        assert_eq!(desk.stats().await.unwrap(), PlatformStats::default());
    }
}
