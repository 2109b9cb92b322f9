use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;
use tokio::sync::RwLock;

use super::model::{Approval, Meal, MealQuery, MealUpdate, NewMeal};
use crate::config::CatalogSettings;
use crate::error::Result;
use crate::storage::{self, DurableStore, MEALS_KEY};

/// Holder of every meal listing across all chefs.
///
/// The persisted snapshot under `allMeals` is the source of truth across
/// restarts. Every mutation rewrites the whole snapshot; a failed write is
/// logged and otherwise ignored.
pub struct Catalog {
    meals: RwLock<Vec<Meal>>,
    last_issued_id: AtomicI64,
    store: Arc<dyn DurableStore>,
    settings: CatalogSettings,
}

impl Catalog {
    /// Creates an empty catalog. Call [`restore`](Self::restore) to load the
    /// persisted snapshot.
    pub fn new(store: Arc<dyn DurableStore>, settings: CatalogSettings) -> Self {
        Self {
            meals: RwLock::new(Vec::new()),
            last_issued_id: AtomicI64::new(0),
            store,
            settings,
        }
    }

    /// Creates a catalog and loads the persisted snapshot.
    pub async fn open(store: Arc<dyn DurableStore>, settings: CatalogSettings) -> Self {
        let catalog = Self::new(store, settings);
        catalog.restore().await;
        catalog
    }

    /// Replaces the in-memory list with the persisted snapshot.
    ///
    /// An absent or malformed snapshot yields an empty catalog.
    pub async fn restore(&self) {
        let meals: Vec<Meal> = storage::load_json_or_none(self.store.as_ref(), MEALS_KEY)
            .await
            .unwrap_or_default();
        tracing::debug!(count = meals.len(), "Restored catalog");
        *self.meals.write().await = meals;
    }

    /// Lists a new meal at the front of the catalog.
    pub async fn add_meal(&self, data: NewMeal) -> Result<Meal> {
        data.validate()?;

        let mut meals = self.meals.write().await;
        let id = self.next_id(&meals);
        let meal = data.into_meal(
            id,
            self.settings.default_rating,
            Utc::now().date_naive(),
        );
        meals.insert(0, meal.clone());
        self.persist(&meals).await;

        tracing::debug!(meal_id = %meal.id, chef_id = %meal.chef_id, "Meal added");
        Ok(meal)
    }

    /// Merges `update` into the meal with `id`.
    ///
    /// Returns the updated meal, or `None` when no meal has that id (nothing
    /// is written in that case).
    pub async fn update_meal(&self, id: &str, update: MealUpdate) -> Result<Option<Meal>> {
        update.validate()?;

        let mut meals = self.meals.write().await;
        let Some(meal) = meals.iter_mut().find(|m| m.id == id) else {
            tracing::debug!(meal_id = id, "Update ignored: no such meal");
            return Ok(None);
        };
        update.apply(meal);
        let updated = meal.clone();
        self.persist(&meals).await;

        tracing::debug!(meal_id = id, "Meal updated");
        Ok(Some(updated))
    }

    /// Removes the meal with `id`, returning it if it existed.
    pub async fn delete_meal(&self, id: &str) -> Option<Meal> {
        let mut meals = self.meals.write().await;
        let position = meals.iter().position(|m| m.id == id);
        let removed = position.map(|index| meals.remove(index));
        self.persist(&meals).await;

        if removed.is_some() {
            tracing::debug!(meal_id = id, "Meal deleted");
        }
        removed
    }

    /// Sets the moderation state of the meal with `id`.
    ///
    /// Returns the updated meal, or `None` when no meal has that id.
    pub async fn set_approval(&self, id: &str, approval: Approval) -> Option<Meal> {
        let mut meals = self.meals.write().await;
        let meal = meals.iter_mut().find(|m| m.id == id)?;
        meal.approval = approval;
        let updated = meal.clone();
        self.persist(&meals).await;

        tracing::info!(meal_id = id, %approval, "Meal moderated");
        Some(updated)
    }

    /// All meals owned by `chef_id`, in catalog order.
    pub async fn meals_by_chef(&self, chef_id: &str) -> Vec<Meal> {
        self.meals
            .read()
            .await
            .iter()
            .filter(|m| m.chef_id == chef_id)
            .cloned()
            .collect()
    }

    /// Orderable meals matching `query`, in catalog order.
    pub async fn browse(&self, query: &MealQuery) -> Vec<Meal> {
        self.meals
            .read()
            .await
            .iter()
            .filter(|m| query.matches(m))
            .cloned()
            .collect()
    }

    pub async fn get(&self, id: &str) -> Option<Meal> {
        self.meals.read().await.iter().find(|m| m.id == id).cloned()
    }

    /// Snapshot of the whole catalog.
    pub async fn meals(&self) -> Vec<Meal> {
        self.meals.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.meals.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.meals.read().await.is_empty()
    }

    /// Millisecond timestamp id, bumped until it is unique.
    fn next_id(&self, meals: &[Meal]) -> String {
        let now = Utc::now().timestamp_millis();
        let mut candidate = now.max(self.last_issued_id.load(Ordering::SeqCst) + 1);
        while meals.iter().any(|m| m.id == candidate.to_string()) {
            candidate += 1;
        }
        self.last_issued_id.store(candidate, Ordering::SeqCst);
        candidate.to_string()
    }

    async fn persist(&self, meals: &[Meal]) {
        storage::persist_json(self.store.as_ref(), MEALS_KEY, meals).await;
    }
}
