use anyhow::Result;
use khana_application::Storefront;
use khana_core::meal::{Cuisine, Location, MealQuery};

pub async fn run(
    storefront: &Storefront,
    search: Option<String>,
    cuisine: Option<Cuisine>,
    location: Option<Location>,
) -> Result<()> {
    let query = MealQuery {
        search,
        cuisine,
        location,
    };
    let meals = storefront.browse(&query).await;

    if meals.is_empty() {
        println!("No meals found. Try adjusting your filters.");
        return Ok(());
    }

    println!("{} meal(s) available:", meals.len());
    for meal in &meals {
        super::print_meal(meal);
    }
    Ok(())
}
