use anyhow::{Context, Result};
use khana_application::{MealForm, Storefront};
use khana_core::meal::MealUpdate;

pub async fn add(storefront: &Storefront, form: MealForm) -> Result<()> {
    let desk = storefront.chef_desk().await?;
    let meal = desk.add_meal(form).await.context("Failed to add meal")?;
    println!("✓ Listed {} ({})", meal.name, meal.id);
    Ok(())
}

pub async fn list(storefront: &Storefront) -> Result<()> {
    let desk = storefront.chef_desk().await?;
    let meals = desk.my_meals().await;

    let active = meals.iter().filter(|m| m.available).count();
    println!(
        "{} meal(s), {} active, {} inactive",
        meals.len(),
        active,
        meals.len() - active
    );
    for meal in &meals {
        super::print_meal(meal);
    }
    Ok(())
}

pub async fn update(storefront: &Storefront, meal_id: &str, update: MealUpdate) -> Result<()> {
    if update.is_empty() {
        println!("Nothing to update");
        return Ok(());
    }
    let desk = storefront.chef_desk().await?;
    let meal = desk
        .update_meal(meal_id, update)
        .await
        .with_context(|| format!("Failed to update meal {}", meal_id))?;
    println!("✓ Updated {}", meal.name);
    Ok(())
}

pub async fn delete(storefront: &Storefront, meal_id: &str) -> Result<()> {
    let desk = storefront.chef_desk().await?;
    let meal = desk
        .delete_meal(meal_id)
        .await
        .with_context(|| format!("Failed to delete meal {}", meal_id))?;
    println!("✓ Deleted {}", meal.name);
    Ok(())
}

pub async fn toggle(storefront: &Storefront, meal_id: &str) -> Result<()> {
    let desk = storefront.chef_desk().await?;
    let meal = desk
        .toggle_availability(meal_id)
        .await
        .with_context(|| format!("Failed to toggle meal {}", meal_id))?;
    let state = if meal.available { "available" } else { "unavailable" };
    println!("✓ {} is now {}", meal.name, state);
    Ok(())
}

pub async fn stats(storefront: &Storefront, recent: usize) -> Result<()> {
    let desk = storefront.chef_desk().await?;
    let stats = desk.stats().await.context("Failed to load orders")?;
    println!(
        "{} order(s), {} unit(s) sold, ₹{} revenue",
        stats.orders, stats.units, stats.revenue
    );

    let orders = desk.recent_orders(recent).await?;
    if !orders.is_empty() {
        println!("Recent orders:");
    }
    for order in &orders {
        super::order::print_order_line(order);
    }
    Ok(())
}
