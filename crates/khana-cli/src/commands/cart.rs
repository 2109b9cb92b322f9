use anyhow::{Context, Result};
use khana_application::Storefront;
use khana_core::order::DeliveryMode;

pub async fn add(storefront: &Storefront, meal_id: &str) -> Result<()> {
    let line = storefront
        .add_to_cart(meal_id)
        .await
        .with_context(|| format!("Failed to add {} to cart", meal_id))?;
    println!("✓ {} added to cart (x{})", line.name, line.quantity);
    Ok(())
}

pub async fn set(storefront: &Storefront, meal_id: &str, quantity: u32) -> Result<()> {
    if storefront.update_cart_quantity(meal_id, quantity).await? {
        show(storefront, DeliveryMode::Delivery).await
    } else {
        println!("{} is not in your cart", meal_id);
        Ok(())
    }
}

pub async fn remove(storefront: &Storefront, meal_id: &str) -> Result<()> {
    if storefront.remove_from_cart(meal_id).await? {
        println!("✓ Removed {}", meal_id);
    } else {
        println!("{} is not in your cart", meal_id);
    }
    Ok(())
}

/// Lists the cart with the price breakdown for `mode`.
pub async fn show(storefront: &Storefront, mode: DeliveryMode) -> Result<()> {
    let cart = storefront.cart().await?;
    if cart.is_empty() {
        println!("Your cart is empty");
        return Ok(());
    }

    println!("Cart ({} item(s)):", cart.item_count());
    for line in cart.items() {
        println!(
            "  {}  {} by {}  ₹{} x {} = ₹{}",
            line.id,
            line.name,
            line.chef_name,
            line.price,
            line.quantity,
            line.line_total()
        );
    }
    let quote = storefront.quote(mode).await?;
    println!("Totals for {}:", mode);
    super::order::print_totals(&quote);
    Ok(())
}

pub async fn clear(storefront: &Storefront) -> Result<()> {
    storefront.clear_cart().await?;
    println!("✓ Cart cleared");
    Ok(())
}
