pub mod admin;
pub mod browse;
pub mod cart;
pub mod chef;
pub mod config;
pub mod order;
pub mod session;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use khana_application::Storefront;
use khana_core::meal::{Approval, Meal};
use khana_core::order::OrderService;
use khana_core::storage::DurableStore;
use khana_infrastructure::{ConfigService, FileStore, KhanaPaths, LocalOrderBook};

/// Config service for `--config`, or the platform default.
pub fn config_service(path: Option<PathBuf>) -> Result<ConfigService> {
    match path {
        Some(path) => Ok(ConfigService::with_path(path)),
        None => ConfigService::new().context("Failed to locate config directory"),
    }
}

/// Loads configuration and restores the storefront from the data directory.
pub async fn open_storefront(
    config_path: Option<PathBuf>,
    data_dir: Option<PathBuf>,
) -> Result<Storefront> {
    let service = config_service(config_path)?;
    let config = service
        .load()
        .with_context(|| format!("Failed to load {}", service.path().display()))?;
    let data_dir = KhanaPaths::resolve_data_dir(data_dir, &config)
        .context("Failed to resolve data directory")?;
    tracing::debug!(data_dir = %data_dir.display(), "Opening storefront");

    let store: Arc<dyn DurableStore> = Arc::new(FileStore::new(data_dir));
    let orders: Arc<dyn OrderService> = Arc::new(LocalOrderBook::new(store.clone()));

    Ok(Storefront::builder(store, orders)
        .config(config)
        .persist_cart(true)
        .build()
        .await)
}

pub(crate) fn print_meal(meal: &Meal) {
    let status = match (meal.approval, meal.available) {
        (Approval::Rejected, _) => "  [rejected]",
        (Approval::Approved, false) => "  [unavailable]",
        (Approval::Approved, true) => "",
    };
    println!(
        "{}  {}  ₹{}  {} · {} · by {} · {} · ★{}{}",
        meal.id,
        meal.name,
        meal.price,
        meal.cuisine,
        meal.location,
        meal.chef_name,
        meal.prep_time,
        meal.rating,
        status
    );
}
