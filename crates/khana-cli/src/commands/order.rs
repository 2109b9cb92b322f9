use anyhow::{Context, Result};
use khana_application::Storefront;
use khana_core::order::{CheckoutRequest, Order, OrderStatus, OrderTotals};

pub async fn checkout(storefront: &Storefront, request: &CheckoutRequest) -> Result<()> {
    let order = storefront
        .checkout(request)
        .await
        .context("Checkout failed")?;
    println!("✓ Order placed: #{}", order.id);
    print_order(&order);
    Ok(())
}

pub async fn show(storefront: &Storefront, order_id: &str) -> Result<()> {
    let order = storefront.track_order(order_id).await?;
    println!("Order #{}  ({})", order.id, order.created_at.format("%Y-%m-%d %H:%M"));
    print_order(&order);
    Ok(())
}

fn print_order(order: &Order) {
    for item in &order.items {
        println!("  {} x {}  ₹{}", item.name, item.quantity, item.price);
    }
    print_totals(&order.totals);

    match &order.address {
        Some(address) => println!("Deliver to: {}", address),
        None => println!("Pickup"),
    }
    println!("Phone: {}", order.phone);

    let current = order.current_status();
    for status in OrderStatus::STEPS {
        let marker = if status.step_index() <= current.step_index() {
            "●"
        } else {
            "○"
        };
        println!("  {} {}", marker, status.label(order.delivery_mode));
    }
}

pub(crate) fn print_totals(totals: &OrderTotals) {
    println!("Subtotal:     ₹{}", totals.subtotal);
    if !totals.delivery_fee.is_zero() {
        println!("Delivery fee: ₹{}", totals.delivery_fee);
    }
    println!("GST:          ₹{}", totals.tax);
    println!("Total:        ₹{}", totals.total);
}

/// One line per order for dashboard listings.
pub(crate) fn print_order_line(order: &Order) {
    let units: u64 = order.items.iter().map(|i| u64::from(i.quantity)).sum();
    println!(
        "#{}  {}  {}  {} unit(s)  ₹{}  {}",
        order.id,
        order.created_at.format("%Y-%m-%d %H:%M"),
        order.customer_name,
        units,
        order.totals.total,
        order.status_label()
    );
}
