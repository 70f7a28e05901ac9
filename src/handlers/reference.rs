use axum::response::Json;

use crate::models::{
    AuthUser, Cuisine, DietaryPreference, DrinkType, ItemCategory, Language, MealType, PriceRange,
};

// Closed vocabularies clients need for pickers and validation. Serialized
// with the same serde names used everywhere else on the wire.

pub async fn list_cuisines(_caller: AuthUser) -> Json<Vec<Cuisine>> {
    Json(Cuisine::ALL.to_vec())
}

pub async fn list_dietary_preferences(_caller: AuthUser) -> Json<Vec<DietaryPreference>> {
    Json(DietaryPreference::ALL.to_vec())
}

pub async fn list_meal_types(_caller: AuthUser) -> Json<Vec<MealType>> {
    Json(MealType::ALL.to_vec())
}

pub async fn list_price_ranges(_caller: AuthUser) -> Json<Vec<PriceRange>> {
    Json(PriceRange::ALL.to_vec())
}

pub async fn list_item_categories(_caller: AuthUser) -> Json<Vec<ItemCategory>> {
    Json(ItemCategory::ALL.to_vec())
}

pub async fn list_drink_types(_caller: AuthUser) -> Json<Vec<DrinkType>> {
    Json(DrinkType::ALL.to_vec())
}

pub async fn list_languages(_caller: AuthUser) -> Json<Vec<Language>> {
    Json(Language::ALL.to_vec())
}
