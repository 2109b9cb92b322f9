use anyhow::{Context, Result};
use khana_application::Storefront;

pub async fn stats(storefront: &Storefront) -> Result<()> {
    let desk = storefront.admin_desk().await?;
    let stats = desk.stats().await.context("Failed to load orders")?;
    println!("Customers: {}", stats.customers);
    println!("Chefs:     {}", stats.chefs);
    println!("Meals:     {} ({} rejected)", stats.meals, stats.rejected_meals);
    println!("Orders:    {}", stats.sales.orders);
    println!("Units:     {}", stats.sales.units);
    println!("Revenue:   ₹{}", stats.sales.revenue);
    Ok(())
}

pub async fn meals(storefront: &Storefront) -> Result<()> {
    let desk = storefront.admin_desk().await?;
    let meals = desk.meals().await;
    println!("{} meal(s)", meals.len());
    for meal in &meals {
        super::print_meal(meal);
    }
    Ok(())
}

pub async fn orders(storefront: &Storefront) -> Result<()> {
    let desk = storefront.admin_desk().await?;
    let orders = desk.orders().await.context("Failed to load orders")?;
    println!("{} order(s)", orders.len());
    for order in &orders {
        super::order::print_order_line(order);
    }
    Ok(())
}

pub async fn approve(storefront: &Storefront, meal_id: &str) -> Result<()> {
    let desk = storefront.admin_desk().await?;
    let meal = desk
        .approve_meal(meal_id)
        .await
        .with_context(|| format!("Failed to approve meal {}", meal_id))?;
    println!("✓ {} is approved", meal.name);
    Ok(())
}

pub async fn reject(storefront: &Storefront, meal_id: &str) -> Result<()> {
    let desk = storefront.admin_desk().await?;
    let meal = desk
        .reject_meal(meal_id)
        .await
        .with_context(|| format!("Failed to reject meal {}", meal_id))?;
    println!("✓ {} is rejected and hidden from customers", meal.name);
    Ok(())
}
