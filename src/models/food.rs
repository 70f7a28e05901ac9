use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Cuisine, DietaryPreference, DrinkType, ItemCategory, MealType};

/// Core catalog food item model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodItem {
    pub id: String,
    pub name: String,
    pub description: String,
    pub cuisine: Cuisine,
    pub category: ItemCategory,
    pub drink_type: Option<DrinkType>,
    pub dietary_preferences: Vec<DietaryPreference>,
    pub meal_types: Vec<MealType>,
    pub nutrition: Option<NutritionFacts>,
    pub ingredients: Vec<String>,
    pub preparation_time_minutes: Option<u32>,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
    pub restaurant_id: Option<String>,
    pub price: Option<Decimal>,
    pub average_rating: Option<f64>,
    pub rating_count: usize,
    pub is_trending: bool,
    pub popularity_score: f64,
}

/// Optional macro-nutrient facts for a food item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutritionFacts {
    pub calories: Option<u32>,
    pub protein_grams: Option<f64>,
    pub carbs_grams: Option<f64>,
    pub fat_grams: Option<f64>,
}

/// Request model for creating a new food item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFoodItemRequest {
    pub name: String,
    pub description: String,
    pub cuisine: Cuisine,
    #[serde(default = "default_category")]
    pub category: ItemCategory,
    pub drink_type: Option<DrinkType>,
    pub dietary_preferences: Vec<DietaryPreference>,
    pub meal_types: Vec<MealType>,
    pub nutrition: Option<NutritionFacts>,
    pub ingredients: Vec<String>,
    pub preparation_time_minutes: Option<u32>,
    pub image_url: Option<String>,
}

fn default_category() -> ItemCategory {
    ItemCategory::Food
}

/// Request model for updating an existing food item
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateFoodItemRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub cuisine: Option<Cuisine>,
    pub category: Option<ItemCategory>,
    pub drink_type: Option<DrinkType>,
    pub dietary_preferences: Option<Vec<DietaryPreference>>,
    pub meal_types: Option<Vec<MealType>>,
    pub nutrition: Option<NutritionFacts>,
    pub ingredients: Option<Vec<String>>,
    pub preparation_time_minutes: Option<u32>,
    pub image_url: Option<String>,
}

/// Filters for querying food items, combined by logical AND
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FoodItemFilters {
    pub cuisine: Option<Cuisine>,
    #[serde(default)]
    pub dietary_preferences: Vec<DietaryPreference>,
    pub meal_type: Option<MealType>,
    pub category: Option<ItemCategory>,
    pub drink_type: Option<DrinkType>,
    pub max_calories: Option<u32>,
    pub max_preparation_time: Option<u32>,
    pub min_rating: Option<f64>,
    pub is_trending: Option<bool>,
    pub search: Option<String>,
}

/// Response model for food item listings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodItemListResponse {
    pub food_items: Vec<FoodItem>,
    pub total_count: usize,
}

impl FoodItem {
    /// Create a new FoodItem with generated ID and timestamps
    pub fn new(request: CreateFoodItemRequest, created_by: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: request.name,
            description: request.description,
            cuisine: request.cuisine,
            category: request.category,
            drink_type: request.drink_type,
            dietary_preferences: request.dietary_preferences,
            meal_types: request.meal_types,
            nutrition: request.nutrition,
            ingredients: request.ingredients,
            preparation_time_minutes: request.preparation_time_minutes,
            image_url: request.image_url,
            created_at: Utc::now(),
            created_by,
            restaurant_id: None,
            price: None,
            average_rating: None,
            rating_count: 0,
            is_trending: false,
            popularity_score: 0.0,
        }
    }

    /// Apply the provided fields of an update request
    pub fn update(&mut self, request: UpdateFoodItemRequest) {
        if let Some(name) = request.name {
            self.name = name;
        }
        if let Some(description) = request.description {
            self.description = description;
        }
        if let Some(cuisine) = request.cuisine {
            self.cuisine = cuisine;
        }
        if let Some(category) = request.category {
            self.category = category;
        }
        if let Some(drink_type) = request.drink_type {
            self.drink_type = Some(drink_type);
        }
        if let Some(preferences) = request.dietary_preferences {
            self.dietary_preferences = preferences;
        }
        if let Some(meal_types) = request.meal_types {
            self.meal_types = meal_types;
        }
        if let Some(nutrition) = request.nutrition {
            self.nutrition = Some(nutrition);
        }
        if let Some(ingredients) = request.ingredients {
            self.ingredients = ingredients;
        }
        if let Some(minutes) = request.preparation_time_minutes {
            self.preparation_time_minutes = Some(minutes);
        }
        if let Some(image_url) = request.image_url {
            self.image_url = Some(image_url);
        }
    }

    /// Overwrite the derived rating fields after a rating write
    pub fn apply_rating_stats(&mut self, average_rating: Option<f64>, rating_count: usize) {
        self.average_rating = average_rating;
        self.rating_count = rating_count;
    }

    pub fn calories(&self) -> Option<u32> {
        self.nutrition.as_ref().and_then(|n| n.calories)
    }

    /// Check if the item matches the given filters
    pub fn matches_filters(&self, filters: &FoodItemFilters) -> bool {
        if let Some(cuisine) = &filters.cuisine {
            if &self.cuisine != cuisine {
                return false;
            }
        }

        // All requested preferences must be present on the item
        if !filters.dietary_preferences.is_empty()
            && !filters
                .dietary_preferences
                .iter()
                .all(|pref| self.dietary_preferences.contains(pref))
        {
            return false;
        }

        if let Some(meal_type) = &filters.meal_type {
            if !self.meal_types.contains(meal_type) {
                return false;
            }
        }

        if let Some(category) = &filters.category {
            if &self.category != category {
                return false;
            }
        }

        if let Some(drink_type) = &filters.drink_type {
            if self.drink_type.as_ref() != Some(drink_type) {
                return false;
            }
        }

        // Items missing the underlying field never pass a range filter
        if let Some(max_calories) = filters.max_calories {
            match self.calories() {
                Some(calories) if calories <= max_calories => {}
                _ => return false,
            }
        }

        if let Some(max_minutes) = filters.max_preparation_time {
            match self.preparation_time_minutes {
                Some(minutes) if minutes <= max_minutes => {}
                _ => return false,
            }
        }

        if let Some(min_rating) = filters.min_rating {
            match self.average_rating {
                Some(rating) if rating >= min_rating => {}
                _ => return false,
            }
        }

        if let Some(is_trending) = filters.is_trending {
            if self.is_trending != is_trending {
                return false;
            }
        }

        if let Some(search) = &filters.search {
            let search_lower = search.to_lowercase();
            if !self.name.to_lowercase().contains(&search_lower)
                && !self.description.to_lowercase().contains(&search_lower)
                && !self
                    .ingredients
                    .iter()
                    .any(|ingredient| ingredient.to_lowercase().contains(&search_lower))
            {
                return false;
            }
        }

        true
    }
}
