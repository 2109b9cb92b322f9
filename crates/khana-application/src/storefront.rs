//! The storefront facade.
//!
//! Composes the three state holders in dependency order (session, then
//! catalog, then cart) and gates each customer, chef or admin action through
//! the access policy. Hosts get one object to inject instead of reaching for
//! ambient state.

use std::sync::Arc;

use khana_core::access::{AccessPolicy, Route};
use khana_core::cart::{Cart, CartItem};
use khana_core::config::StorefrontConfig;
use khana_core::error::{KhanaError, Result, ValidationError};
use khana_core::meal::{Catalog, Meal, MealQuery};
use khana_core::order::{CheckoutRequest, DeliveryMode, Order, OrderService, OrderTotals};
use khana_core::session::SessionState;
use khana_core::storage::{self, CART_KEY, DurableStore};
use khana_core::user::{Role, UserSession};
use tokio::sync::Mutex;

use crate::admin_desk::AdminDesk;
use crate::chef_desk::ChefDesk;
use crate::checkout::CheckoutUseCase;

/// Builder for [`Storefront`].
pub struct StorefrontBuilder {
    store: Arc<dyn DurableStore>,
    orders: Arc<dyn OrderService>,
    config: StorefrontConfig,
    persist_cart: bool,
}

impl StorefrontBuilder {
    pub fn new(store: Arc<dyn DurableStore>, orders: Arc<dyn OrderService>) -> Self {
        Self {
            store,
            orders,
            config: StorefrontConfig::default(),
            persist_cart: false,
        }
    }

    pub fn config(mut self, config: StorefrontConfig) -> Self {
        self.config = config;
        self
    }

    /// Keep the cart under the `cart` key so it survives a restart.
    pub fn persist_cart(mut self, persist: bool) -> Self {
        self.persist_cart = persist;
        self
    }

    /// Restores session and catalog (and the cart, if persisted).
    pub async fn build(self) -> Storefront {
        let session = SessionState::open(self.store.clone(), self.config.session.clone()).await;
        let catalog = Catalog::open(self.store.clone(), self.config.catalog.clone()).await;

        let cart = if self.persist_cart {
            storage::load_json_or_none::<Vec<CartItem>>(self.store.as_ref(), CART_KEY)
                .await
                .map(Cart::from_items)
                .unwrap_or_default()
        } else {
            Cart::new()
        };

        Storefront {
            session,
            catalog,
            cart: Mutex::new(cart),
            checkout: CheckoutUseCase::new(self.orders.clone(), self.config.checkout.clone()),
            orders: self.orders,
            store: self.store,
            config: self.config,
            persist_cart: self.persist_cart,
        }
    }
}

/// Session, catalog and cart for one client.
pub struct Storefront {
    session: SessionState,
    catalog: Catalog,
    cart: Mutex<Cart>,
    checkout: CheckoutUseCase,
    orders: Arc<dyn OrderService>,
    store: Arc<dyn DurableStore>,
    config: StorefrontConfig,
    persist_cart: bool,
}

impl Storefront {
    pub fn builder(store: Arc<dyn DurableStore>, orders: Arc<dyn OrderService>) -> StorefrontBuilder {
        StorefrontBuilder::new(store, orders)
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn config(&self) -> &StorefrontConfig {
        &self.config
    }

    pub async fn current_user(&self) -> Option<UserSession> {
        self.session.current().await
    }

    // ============================================================================
    // Session
    // ============================================================================

    /// Logs in and returns the session with the view it should land on.
    pub async fn login(&self, email: &str, password: &str, role: Role) -> Result<(UserSession, Route)> {
        let session = self.session.login(email, password, role).await?;
        let landing = Route::landing_for(session.role);
        Ok((session, landing))
    }

    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        role: Role,
    ) -> Result<(UserSession, Route)> {
        let session = self.session.register(name, email, password, role).await?;
        let landing = Route::landing_for(session.role);
        Ok((session, landing))
    }

    pub async fn logout(&self) {
        self.session.logout().await;
    }

    /// Returns the current session if it may open `route`.
    pub async fn authorize(&self, route: Route) -> Result<UserSession> {
        let current = self.session.current().await;
        AccessPolicy::require(current.as_ref(), route).cloned()
    }

    // ============================================================================
    // Browsing
    // ============================================================================

    /// Orderable meals matching `query`. Open to everyone.
    pub async fn browse(&self, query: &MealQuery) -> Vec<Meal> {
        self.catalog.browse(query).await
    }

    // ============================================================================
    // Cart (customers only)
    // ============================================================================

    /// Snapshot of the cart.
    pub async fn cart(&self) -> Result<Cart> {
        self.authorize(Route::Cart).await?;
        Ok(self.cart.lock().await.clone())
    }

    /// Adds one unit of an orderable meal, snapshotting its current price.
    pub async fn add_to_cart(&self, meal_id: &str) -> Result<CartItem> {
        self.authorize(Route::Cart).await?;

        let meal = self
            .catalog
            .get(meal_id)
            .await
            .ok_or_else(|| KhanaError::not_found("meal", meal_id))?;
        if !meal.is_orderable() {
            return Err(ValidationError::MealUnavailable.into());
        }

        let mut cart = self.cart.lock().await;
        cart.add_item(CartItem::from_meal(&meal))?;
        let line = cart
            .get(meal_id)
            .cloned()
            .ok_or_else(|| KhanaError::internal("cart line vanished after insert"))?;
        self.save_cart(&cart).await;

        tracing::debug!(meal_id, quantity = line.quantity, "Added to cart");
        Ok(line)
    }

    /// Sets a line's quantity; zero removes it. Returns false if the meal was
    /// not in the cart.
    pub async fn update_cart_quantity(&self, meal_id: &str, quantity: u32) -> Result<bool> {
        self.authorize(Route::Cart).await?;
        let mut cart = self.cart.lock().await;
        let changed = cart.update_quantity(meal_id, quantity);
        if changed {
            self.save_cart(&cart).await;
        }
        Ok(changed)
    }

    pub async fn remove_from_cart(&self, meal_id: &str) -> Result<bool> {
        self.authorize(Route::Cart).await?;
        let mut cart = self.cart.lock().await;
        let removed = cart.remove_item(meal_id);
        if removed {
            self.save_cart(&cart).await;
        }
        Ok(removed)
    }

    pub async fn clear_cart(&self) -> Result<()> {
        self.authorize(Route::Cart).await?;
        let mut cart = self.cart.lock().await;
        cart.clear();
        self.save_cart(&cart).await;
        Ok(())
    }

    // ============================================================================
    // Checkout and orders
    // ============================================================================

    /// Price breakdown for the current cart if fulfilled by `mode`.
    pub async fn quote(&self, mode: DeliveryMode) -> Result<OrderTotals> {
        self.authorize(Route::Cart).await?;
        let cart = self.cart.lock().await;
        Ok(self.checkout.quote(&cart, mode))
    }

    /// Places an order for the current cart and empties it.
    pub async fn checkout(&self, request: &CheckoutRequest) -> Result<Order> {
        let customer = self.authorize(Route::Cart).await?;
        let mut cart = self.cart.lock().await;
        let order = self
            .checkout
            .place_order(&mut cart, &customer, request)
            .await?;
        self.save_cart(&cart).await;
        Ok(order)
    }

    /// Fetches an order from the order service. Any logged-in role may look.
    pub async fn track_order(&self, order_id: &str) -> Result<Order> {
        self.authorize(Route::OrderTracking).await?;
        self.checkout
            .find_order(order_id)
            .await?
            .ok_or_else(|| KhanaError::not_found("order", order_id))
    }

    // ============================================================================
    // Chef dashboard
    // ============================================================================

    /// Opens the dashboard for the logged-in chef.
    pub async fn chef_desk(&self) -> Result<ChefDesk<'_>> {
        let chef = self.authorize(Route::ChefDashboard).await?;
        Ok(ChefDesk::new(
            &self.catalog,
            self.orders.as_ref(),
            &self.config.catalog,
            chef,
        ))
    }

    // ============================================================================
    // Admin dashboard
    // ============================================================================

    /// Opens the dashboard for the logged-in admin.
    pub async fn admin_desk(&self) -> Result<AdminDesk<'_>> {
        let admin = self.authorize(Route::Admin).await?;
        Ok(AdminDesk::new(&self.catalog, self.orders.as_ref(), admin))
    }

    async fn save_cart(&self, cart: &Cart) {
        if self.persist_cart {
            storage::persist_json(self.store.as_ref(), CART_KEY, cart).await;
        }
    }
}
