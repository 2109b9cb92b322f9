//! Meal listing domain models.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::error::{Result, ValidationError};

/// Cuisine category a chef files a meal under.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum Cuisine {
    #[serde(rename = "North Indian")]
    #[strum(to_string = "North Indian", serialize = "north-indian")]
    NorthIndian,
    #[serde(rename = "South Indian")]
    #[strum(to_string = "South Indian", serialize = "south-indian")]
    SouthIndian,
    Gujarati,
    Punjabi,
    Bengali,
    Maharashtrian,
    Rajasthani,
    #[serde(rename = "Street Food")]
    #[strum(to_string = "Street Food", serialize = "street-food")]
    StreetFood,
}

/// City a meal is offered in.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum Location {
    #[serde(rename = "Delhi NCR")]
    #[strum(to_string = "Delhi NCR", serialize = "delhi-ncr", serialize = "delhi")]
    DelhiNcr,
    Mumbai,
    Bangalore,
    Chennai,
    Hyderabad,
    Pune,
    Kolkata,
    Ahmedabad,
    Jaipur,
}

/// Moderation state of a listing, set by an admin.
///
/// Listings start approved; a rejected listing is hidden from customers
/// until it is approved again.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Approval {
    #[default]
    Approved,
    Rejected,
}

/// A meal listed by a chef.
///
/// `id` is unique across the catalog and `chef_id` never changes after the
/// listing is created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meal {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub image: String,
    pub chef_name: String,
    pub chef_id: String,
    pub cuisine: Cuisine,
    /// Average rating, 0 to 5
    pub rating: Decimal,
    pub prep_time: String,
    pub available: bool,
    pub location: Location,
    pub created_at: NaiveDate,
    /// Absent in records written before moderation existed
    #[serde(default)]
    pub approval: Approval,
}

impl Meal {
    /// Whether customers may see and order this meal.
    pub fn is_orderable(&self) -> bool {
        self.available && self.approval == Approval::Approved
    }
}

/// Everything a chef supplies when listing a meal.
///
/// The catalog assigns id, rating and creation date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMeal {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub image: String,
    pub chef_name: String,
    pub chef_id: String,
    pub cuisine: Cuisine,
    pub prep_time: String,
    pub available: bool,
    pub location: Location,
}

impl NewMeal {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingField("name").into());
        }
        if self.description.trim().is_empty() {
            return Err(ValidationError::MissingField("description").into());
        }
        if self.chef_id.trim().is_empty() {
            return Err(ValidationError::MissingField("chefId").into());
        }
        validate_price(self.price)
    }

    pub(crate) fn into_meal(self, id: String, rating: Decimal, created_at: NaiveDate) -> Meal {
        Meal {
            id,
            name: self.name,
            description: self.description,
            price: self.price,
            image: self.image,
            chef_name: self.chef_name,
            chef_id: self.chef_id,
            cuisine: self.cuisine,
            rating,
            prep_time: self.prep_time,
            available: self.available,
            location: self.location,
            created_at,
            approval: Approval::Approved,
        }
    }
}

/// A partial update to a meal. `None` leaves the field untouched.
///
/// The identifier, owning chef and creation date are not updatable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MealUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub image: Option<String>,
    pub chef_name: Option<String>,
    pub cuisine: Option<Cuisine>,
    pub rating: Option<Decimal>,
    pub prep_time: Option<String>,
    pub available: Option<bool>,
    pub location: Option<Location>,
}

impl MealUpdate {
    /// Shorthand for flipping only the availability flag.
    pub fn availability(available: bool) -> Self {
        Self {
            available: Some(available),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(price) = self.price {
            validate_price(price)?;
        }
        if let Some(rating) = self.rating {
            if rating < Decimal::ZERO || rating > Decimal::from(5) {
                return Err(ValidationError::InvalidRating.into());
            }
        }
        if matches!(self.name.as_deref(), Some(n) if n.trim().is_empty()) {
            return Err(ValidationError::MissingField("name").into());
        }
        Ok(())
    }

    /// Merges the supplied fields into `meal`.
    pub fn apply(self, meal: &mut Meal) {
        if let Some(name) = self.name {
            meal.name = name;
        }
        if let Some(description) = self.description {
            meal.description = description;
        }
        if let Some(price) = self.price {
            meal.price = price;
        }
        if let Some(image) = self.image {
            meal.image = image;
        }
        if let Some(chef_name) = self.chef_name {
            meal.chef_name = chef_name;
        }
        if let Some(cuisine) = self.cuisine {
            meal.cuisine = cuisine;
        }
        if let Some(rating) = self.rating {
            meal.rating = rating;
        }
        if let Some(prep_time) = self.prep_time {
            meal.prep_time = prep_time;
        }
        if let Some(available) = self.available {
            meal.available = available;
        }
        if let Some(location) = self.location {
            meal.location = location;
        }
    }
}

fn validate_price(price: Decimal) -> Result<()> {
    if price <= Decimal::ZERO {
        return Err(ValidationError::InvalidPrice.into());
    }
    Ok(())
}

/// Storefront browse filter.
///
/// Only orderable meals (available and not rejected) ever match. The free-text search is
/// case-insensitive over name, description, chef name and cuisine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MealQuery {
    pub search: Option<String>,
    pub cuisine: Option<Cuisine>,
    pub location: Option<Location>,
}

impl MealQuery {
    pub fn matches(&self, meal: &Meal) -> bool {
        if !meal.is_orderable() {
            return false;
        }

        if let Some(search) = self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            let needle = search.to_lowercase();
            let cuisine = meal.cuisine.to_string();
            let hit = [
                meal.name.as_str(),
                meal.description.as_str(),
                meal.chef_name.as_str(),
                cuisine.as_str(),
            ]
            .iter()
            .any(|field| field.to_lowercase().contains(&needle));
            if !hit {
                return false;
            }
        }

        if self.cuisine.is_some_and(|c| c != meal.cuisine) {
            return false;
        }
        if self.location.is_some_and(|l| l != meal.location) {
            return false;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn sample() -> Meal {
        Meal {
            id: "1".to_string(),
            name: "Homemade Butter Chicken".to_string(),
            description: "Creamy tomato gravy".to_string(),
            price: Decimal::new(1599, 2),
            image: "/img.png".to_string(),
            chef_name: "Priya Sharma".to_string(),
            chef_id: "c1".to_string(),
            cuisine: Cuisine::NorthIndian,
            rating: Decimal::new(45, 1),
            prep_time: "30 mins".to_string(),
            available: true,
            location: Location::DelhiNcr,
            created_at: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            approval: Approval::Approved,
        }
    }

    #[test]
    fn test_enum_spellings() {
        assert_eq!(Cuisine::StreetFood.to_string(), "Street Food");
        assert_eq!(Cuisine::from_str("street food").unwrap(), Cuisine::StreetFood);
        assert_eq!(Cuisine::from_str("north-indian").unwrap(), Cuisine::NorthIndian);
        assert_eq!(Location::from_str("delhi").unwrap(), Location::DelhiNcr);
        assert_eq!(
            serde_json::to_string(&Location::DelhiNcr).unwrap(),
            "\"Delhi NCR\""
        );
    }

    #[test]
    fn test_meal_json_field_names() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(value["chefId"], "c1");
        assert_eq!(value["chefName"], "Priya Sharma");
        assert_eq!(value["prepTime"], "30 mins");
        assert_eq!(value["createdAt"], "2024-01-15");
        assert_eq!(value["cuisine"], "North Indian");
    }

    #[test]
    fn test_update_touches_only_given_fields() {
        let mut meal = sample();
        let before = meal.clone();

        MealUpdate::availability(false).apply(&mut meal);

        assert!(!meal.available);
        meal.available = true;
        assert_eq!(meal, before);
    }

    #[test]
    fn test_update_validation() {
        let bad_price = MealUpdate {
            price: Some(Decimal::ZERO),
            ..MealUpdate::default()
        };
        assert_eq!(
            bad_price.validate().unwrap_err().as_validation(),
            Some(&ValidationError::InvalidPrice)
        );

        let bad_rating = MealUpdate {
            rating: Some(Decimal::new(51, 1)),
            ..MealUpdate::default()
        };
        assert_eq!(
            bad_rating.validate().unwrap_err().as_validation(),
            Some(&ValidationError::InvalidRating)
        );

        assert!(MealUpdate::default().is_empty());
        assert!(MealUpdate::default().validate().is_ok());
    }

    #[test]
    fn test_query_filters() {
        let meal = sample();
        assert!(MealQuery::default().matches(&meal));

        let by_chef = MealQuery {
            search: Some("PRIYA".to_string()),
            ..MealQuery::default()
        };
        assert!(by_chef.matches(&meal));

        let by_cuisine_text = MealQuery {
            search: Some("north".to_string()),
            ..MealQuery::default()
        };
        assert!(by_cuisine_text.matches(&meal));

        let miss = MealQuery {
            search: Some("lasagna".to_string()),
            ..MealQuery::default()
        };
        assert!(!miss.matches(&meal));

        let wrong_city = MealQuery {
            location: Some(Location::Mumbai),
            ..MealQuery::default()
        };
        assert!(!wrong_city.matches(&meal));

        let mut hidden = meal.clone();
        hidden.available = false;
        assert!(!MealQuery::default().matches(&hidden));

        let mut rejected = meal.clone();
        rejected.approval = Approval::Rejected;
        assert!(!rejected.is_orderable());
        assert!(!MealQuery::default().matches(&rejected));
    }

    #[test]
    fn test_records_without_approval_load_as_approved() {
        let mut value = serde_json::to_value(sample()).unwrap();
        value.as_object_mut().unwrap().remove("approval");
        let meal: Meal = serde_json::from_value(value).unwrap();
        assert_eq!(meal.approval, Approval::Approved);
    }
}
