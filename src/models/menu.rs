use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ItemCategory;

/// Join record placing a food item on a restaurant's menu at a price
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: String,
    pub restaurant_id: String,
    pub food_item_id: String,
    pub price: Decimal,
    pub available: bool,
    pub special: bool,
    pub discount_percentage: Option<f64>,
}

/// Request body for adding a menu item to a restaurant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMenuItemRequest {
    pub food_item_id: String,
    pub price: Decimal,
    #[serde(default = "default_true")]
    pub available: bool,
    #[serde(default)]
    pub special: bool,
    pub discount_percentage: Option<f64>,
}

fn default_true() -> bool {
    true
}

impl MenuItem {
    pub fn new(restaurant_id: String, request: CreateMenuItemRequest) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            restaurant_id,
            food_item_id: request.food_item_id,
            price: request.price,
            available: request.available,
            special: request.special,
            discount_percentage: request.discount_percentage,
        }
    }
}

/// Named group of menu items, in display order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuSection {
    pub id: String,
    pub restaurant_id: String,
    pub name: String,
    pub description: Option<String>,
    /// Ordered menu item ids
    pub items: Vec<String>,
}

/// Request body for adding a menu section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMenuSectionRequest {
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub items: Vec<String>,
}

impl MenuSection {
    pub fn new(restaurant_id: String, request: CreateMenuSectionRequest) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            restaurant_id,
            name: request.name,
            description: request.description,
            items: request.items,
        }
    }
}

/// A menu section with its items resolved against the food catalog
#[derive(Debug, Clone, Serialize)]
pub struct MenuSectionView {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub items: Vec<MenuEntryView>,
}

/// A single resolved menu entry
#[derive(Debug, Clone, Serialize)]
pub struct MenuEntryView {
    pub id: String,
    pub food_item_id: String,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub available: bool,
    pub special: bool,
    pub discount_percentage: Option<f64>,
    pub category: ItemCategory,
    pub image_url: Option<String>,
    pub average_rating: Option<f64>,
    pub rating_count: usize,
}
