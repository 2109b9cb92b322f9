//! Meal catalog domain module.
//!
//! # Module Structure
//!
//! - `model`: meal listing, categories, partial updates and browse filter
//! - `catalog`: the catalog state holder

mod catalog;
mod model;

pub use catalog::Catalog;
pub use model::{Approval, Cuisine, Location, Meal, MealQuery, MealUpdate, NewMeal};
