use anyhow::{Context, Result};
use khana_application::Storefront;
use khana_core::user::Role;

pub async fn login(storefront: &Storefront, email: &str, password: &str, role: Role) -> Result<()> {
    let (session, landing) = storefront
        .login(email, password, role)
        .await
        .context("Login failed")?;
    println!("✓ Logged in as {} ({})", session.name, session.role);
    println!("  Next: {}", landing);
    Ok(())
}

pub async fn register(
    storefront: &Storefront,
    name: &str,
    email: &str,
    password: &str,
    role: Role,
) -> Result<()> {
    let (session, landing) = storefront
        .register(name, email, password, role)
        .await
        .context("Registration failed")?;
    println!("✓ Welcome, {} ({})", session.name, session.role);
    println!("  Next: {}", landing);
    Ok(())
}

pub async fn logout(storefront: &Storefront) -> Result<()> {
    storefront.logout().await;
    println!("✓ Logged out");
    Ok(())
}

pub async fn whoami(storefront: &Storefront) -> Result<()> {
    match storefront.current_user().await {
        Some(session) => {
            println!("{} <{}>", session.name, session.email);
            println!("  role: {}", session.role);
            println!("  id:   {}", session.id);
        }
        None => println!("Not logged in"),
    }
    Ok(())
}
