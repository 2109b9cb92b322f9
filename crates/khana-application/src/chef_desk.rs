//! Chef dashboard operations.
//!
//! A [`ChefDesk`] is bound to one chef session. It fills in ownership and
//! defaults for new listings, refuses to touch meals owned by anyone else,
//! and reports sales from the orders that include the chef's meals.

use khana_core::config::CatalogSettings;
use khana_core::error::{KhanaError, Result};
use khana_core::meal::{Catalog, Cuisine, Location, Meal, MealUpdate, NewMeal};
use khana_core::order::{Order, OrderService, SalesSummary};
use khana_core::user::UserSession;
use rust_decimal::Decimal;

/// The add-meal form.
#[derive(Debug, Clone, PartialEq)]
pub struct MealForm {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub cuisine: Cuisine,
    pub location: Location,
    /// Defaults to the configured prep time when blank
    pub prep_time: Option<String>,
    /// Defaults to the placeholder image when blank
    pub image: Option<String>,
}

pub struct ChefDesk<'a> {
    catalog: &'a Catalog,
    orders: &'a dyn OrderService,
    settings: &'a CatalogSettings,
    chef: UserSession,
}

impl<'a> ChefDesk<'a> {
    /// Binds a desk to `chef`. Callers check the role beforehand.
    pub(crate) fn new(
        catalog: &'a Catalog,
        orders: &'a dyn OrderService,
        settings: &'a CatalogSettings,
        chef: UserSession,
    ) -> Self {
        Self {
            catalog,
            orders,
            settings,
            chef,
        }
    }

    pub fn chef(&self) -> &UserSession {
        &self.chef
    }

    /// This chef's meals, newest first.
    pub async fn my_meals(&self) -> Vec<Meal> {
        self.catalog.meals_by_chef(&self.chef.id).await
    }

    /// Lists a new, available meal under this chef.
    pub async fn add_meal(&self, form: MealForm) -> Result<Meal> {
        let new_meal = NewMeal {
            name: form.name.trim().to_string(),
            description: form.description.trim().to_string(),
            price: form.price,
            image: non_blank(form.image).unwrap_or_else(|| self.settings.image_placeholder.clone()),
            chef_name: self.chef.name.clone(),
            chef_id: self.chef.id.clone(),
            cuisine: form.cuisine,
            prep_time: non_blank(form.prep_time)
                .unwrap_or_else(|| self.settings.default_prep_time.clone()),
            available: true,
            location: form.location,
        };

        let meal = self.catalog.add_meal(new_meal).await?;
        tracing::info!(meal_id = %meal.id, name = %meal.name, "Chef listed a meal");
        Ok(meal)
    }

    /// Applies `update` to one of this chef's meals.
    pub async fn update_meal(&self, meal_id: &str, update: MealUpdate) -> Result<Meal> {
        self.owned(meal_id).await?;
        self.catalog
            .update_meal(meal_id, update)
            .await?
            .ok_or_else(|| KhanaError::not_found("meal", meal_id))
    }

    /// Removes one of this chef's meals.
    pub async fn delete_meal(&self, meal_id: &str) -> Result<Meal> {
        self.owned(meal_id).await?;
        self.catalog
            .delete_meal(meal_id)
            .await
            .ok_or_else(|| KhanaError::not_found("meal", meal_id))
    }

    /// Flips availability, hiding or showing the meal to customers.
    pub async fn toggle_availability(&self, meal_id: &str) -> Result<Meal> {
        let meal = self.owned(meal_id).await?;
        self.update_meal(meal_id, MealUpdate::availability(!meal.available))
            .await
    }

    /// Orders containing at least one of this chef's meals, newest first.
    pub async fn recent_orders(&self, limit: usize) -> Result<Vec<Order>> {
        let mut orders = self.orders.list().await?;
        orders.retain(|order| order.includes_chef(&self.chef.id));
        orders.reverse();
        orders.truncate(limit);
        Ok(orders)
    }

    /// Orders, units and revenue from this chef's lines.
    pub async fn stats(&self) -> Result<SalesSummary> {
        let orders = self.orders.list().await?;
        Ok(SalesSummary::for_chef(&orders, &self.chef.id))
    }

    async fn owned(&self, meal_id: &str) -> Result<Meal> {
        let meal = self
            .catalog
            .get(meal_id)
            .await
            .ok_or_else(|| KhanaError::not_found("meal", meal_id))?;
        if meal.chef_id != self.chef.id {
            return Err(KhanaError::access_denied(format!(
                "meal '{}' belongs to another chef",
                meal_id
            )));
        }
        Ok(meal)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use khana_core::cart::{Cart, CartItem};
    use khana_core::config::CheckoutSettings;
    use khana_core::order::{CheckoutRequest, DeliveryMode};
    use khana_core::storage::MemoryStore;
    use khana_core::user::Role;
    use khana_infrastructure::LocalOrderBook;
    use std::sync::Arc;

    fn form(name: &str) -> MealForm {
        MealForm {
            name: name.to_string(),
            description: "Slow-cooked".to_string(),
            price: Decimal::from(120),
            cuisine: Cuisine::Bengali,
            location: Location::Kolkata,
            prep_time: None,
            image: Some("  ".to_string()),
        }
    }

    async fn catalog() -> Catalog {
        Catalog::open(Arc::new(MemoryStore::new()), CatalogSettings::default()).await
    }

    fn chef(email: &str) -> UserSession {
        UserSession::synthesize("Chef", email, Role::Chef, None)
    }

    fn book() -> LocalOrderBook {
        LocalOrderBook::new(Arc::new(MemoryStore::new()))
    }

    fn order_of(id: &str, meals: &[(&Meal, u32)]) -> Order {
        let mut cart = Cart::new();
        for (meal, quantity) in meals {
            cart.add_item(CartItem::from_meal(meal)).unwrap();
            cart.update_quantity(&meal.id, *quantity);
        }
        Order::place(
            id.to_string(),
            &UserSession::synthesize("Asha", "asha@example.com", Role::Customer, None),
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

    #[tokio::test]
    async fn test_add_meal_fills_defaults() {
        let catalog = catalog().await;
        let orders = book();
        let settings = CatalogSettings::default();
        let desk = ChefDesk::new(&catalog, &orders, &settings, chef("a@x.com"));

        let meal = desk.add_meal(form("Shorshe Ilish")).await.unwrap();

        assert_eq!(meal.chef_id, desk.chef().id);
        assert_eq!(meal.prep_time, "30 mins");
        assert_eq!(meal.image, settings.image_placeholder);
        assert!(meal.available);
        assert_eq!(desk.my_meals().await, vec![meal]);
    }

    #[tokio::test]
    async fn test_cannot_touch_other_chefs_meals() {
        let catalog = catalog().await;
        let orders = book();
        let settings = CatalogSettings::default();
        let owner = ChefDesk::new(&catalog, &orders, &settings, chef("a@x.com"));
        let other = ChefDesk::new(&catalog, &orders, &settings, chef("b@x.com"));

        let meal = owner.add_meal(form("Mishti Doi")).await.unwrap();

        assert!(other.delete_meal(&meal.id).await.unwrap_err().is_access_denied());
        assert!(
            other
                .toggle_availability(&meal.id)
                .await
                .unwrap_err()
                .is_access_denied()
        );
        assert!(other.my_meals().await.is_empty());
        assert_eq!(catalog.len().await, 1);
    }

    #[tokio::test]
    async fn test_toggle_and_delete() {
        let catalog = catalog().await;
        let orders = book();
        let settings = CatalogSettings::default();
        let desk = ChefDesk::new(&catalog, &orders, &settings, chef("a@x.com"));
        let meal = desk.add_meal(form("Luchi")).await.unwrap();

        let hidden = desk.toggle_availability(&meal.id).await.unwrap();
        assert!(!hidden.available);
        let shown = desk.toggle_availability(&meal.id).await.unwrap();
        assert!(shown.available);

        desk.delete_meal(&meal.id).await.unwrap();
        assert!(desk.delete_meal(&meal.id).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_update_price() {
        let catalog = catalog().await;
        let orders = book();
        let settings = CatalogSettings::default();
        let desk = ChefDesk::new(&catalog, &orders, &settings, chef("a@x.com"));
        let meal = desk.add_meal(form("Luchi")).await.unwrap();

        let updated = desk
            .update_meal(
                &meal.id,
                MealUpdate {
                    price: Some(Decimal::from(90)),
                    ..MealUpdate::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.price, Decimal::from(90));
        assert_eq!(updated.name, meal.name);

        let err = desk
            .update_meal(
                &meal.id,
                MealUpdate {
                    price: Some(Decimal::from(-1)),
                    ..MealUpdate::default()
                },
            )
            .await
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn test_stats_cover_only_own_lines() {
        let catalog = catalog().await;
        let orders = book();
        let settings = CatalogSettings::default();
        let priya = ChefDesk::new(&catalog, &orders, &settings, chef("priya@x.com"));
        let ravi = ChefDesk::new(&catalog, &orders, &settings, chef("ravi@x.com"));

        let luchi = priya.add_meal(form("Luchi")).await.unwrap();
        let dosa = ravi.add_meal(form("Dosa")).await.unwrap();

        orders
            .submit(order_of("aaa", &[(&luchi, 2), (&dosa, 1)]))
            .await
            .unwrap();
        orders.submit(order_of("bbb", &[(&dosa, 3)])).await.unwrap();
        orders.submit(order_of("ccc", &[(&luchi, 1)])).await.unwrap();

        let stats = priya.stats().await.unwrap();
        assert_eq!(stats.orders, 2);
        assert_eq!(stats.units, 3);
        assert_eq!(stats.revenue, Decimal::from(360));

        let recent: Vec<_> = priya
            .recent_orders(10)
            .await
            .unwrap()
            .into_iter()
            .map(|o| o.id)
            .collect();
        assert_eq!(recent, ["ccc", "aaa"]);
        assert_eq!(priya.recent_orders(1).await.unwrap().len(), 1);

        let stats = ravi.stats().await.unwrap();
        assert_eq!(stats.orders, 2);
        assert_eq!(stats.units, 4);
    }

    #[tokio::test]
    async fn test_stats_empty_without_orders() {
        let catalog = catalog().await;
        let orders = book();
        let settings = CatalogSettings::default();
        let desk = ChefDesk::new(&catalog, &orders, &settings, chef("a@x.com"));
        desk.add_meal(form("Luchi")).await.unwrap();

        assert_eq!(desk.stats().await.unwrap(), SalesSummary::default());
        assert!(desk.recent_orders(5).await.unwrap().is_empty());
    }
}
