use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{
    Cuisine, DietaryPreference, FoodItem, ItemCategory, MealType, PriceRange, Restaurant, SortKey,
};

/// Coarse time-of-day buckets, each mapped onto a meal slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeOfDay {
    Morning,
    Afternoon,
    Evening,
}

impl TimeOfDay {
    /// The meal slot recommended for this time of day
    pub fn meal_type(&self) -> MealType {
        match self {
            TimeOfDay::Morning => MealType::Breakfast,
            TimeOfDay::Afternoon => MealType::Lunch,
            TimeOfDay::Evening => MealType::Dinner,
        }
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TimeOfDay::Morning => "morning",
            TimeOfDay::Afternoon => "afternoon",
            TimeOfDay::Evening => "evening",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for TimeOfDay {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "morning" => Ok(TimeOfDay::Morning),
            "afternoon" => Ok(TimeOfDay::Afternoon),
            "evening" => Ok(TimeOfDay::Evening),
            _ => Err(format!("Invalid time of day: {}", s)),
        }
    }
}

/// Body for requesting recommendations with explicit liked-item history
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecommendationRequest {
    pub cuisine: Option<Cuisine>,
    #[serde(default)]
    pub dietary_preferences: Vec<DietaryPreference>,
    pub meal_type: Option<MealType>,
    pub category: Option<ItemCategory>,
    pub max_calories: Option<u32>,
    pub max_preparation_time: Option<u32>,
    pub time_of_day: Option<TimeOfDay>,
    #[serde(default)]
    pub previous_liked: Vec<String>,
    #[serde(default)]
    pub sort_by: SortKey,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecommendationResponse {
    pub recommendations: Vec<FoodItem>,
    pub count: usize,
}

/// Body for the combined food + restaurant search
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchRequest {
    pub query: Option<String>,
    /// Matches foods/restaurants serving ANY of the requested cuisines
    #[serde(default)]
    pub cuisines: Vec<Cuisine>,
    /// Item must carry ALL requested preferences
    #[serde(default)]
    pub dietary_preferences: Vec<DietaryPreference>,
    /// Item must cover ANY of the requested meal slots
    #[serde(default)]
    pub meal_types: Vec<MealType>,
    #[serde(default)]
    pub categories: Vec<ItemCategory>,
    pub max_calories: Option<u32>,
    pub max_preparation_time: Option<u32>,
    #[serde(default)]
    pub price_range: Vec<PriceRange>,
    pub min_rating: Option<f64>,
    #[serde(default)]
    pub sort_by: SortKey,
}

impl SearchRequest {
    /// Food-item side of the combined search
    pub fn matches_food(&self, item: &FoodItem) -> bool {
        if !self.cuisines.is_empty() && !self.cuisines.contains(&item.cuisine) {
            return false;
        }

        if !self.dietary_preferences.is_empty()
            && !self
                .dietary_preferences
                .iter()
                .all(|pref| item.dietary_preferences.contains(pref))
        {
            return false;
        }

        if !self.meal_types.is_empty()
            && !self
                .meal_types
                .iter()
                .any(|meal| item.meal_types.contains(meal))
        {
            return false;
        }

        if !self.categories.is_empty() && !self.categories.contains(&item.category) {
            return false;
        }

        if let Some(max_calories) = self.max_calories {
            match item.calories() {
                Some(calories) if calories <= max_calories => {}
                _ => return false,
            }
        }

        if let Some(max_minutes) = self.max_preparation_time {
            match item.preparation_time_minutes {
                Some(minutes) if minutes <= max_minutes => {}
                _ => return false,
            }
        }

        if let Some(min_rating) = self.min_rating {
            match item.average_rating {
                Some(rating) if rating >= min_rating => {}
                _ => return false,
            }
        }

        if let Some(query) = &self.query {
            let query = query.to_lowercase();
            if !item.name.to_lowercase().contains(&query)
                && !item.description.to_lowercase().contains(&query)
                && !item
                    .ingredients
                    .iter()
                    .any(|ingredient| ingredient.to_lowercase().contains(&query))
            {
                return false;
            }
        }

        true
    }

    /// Restaurant side of the combined search
    pub fn matches_restaurant(&self, restaurant: &Restaurant) -> bool {
        if !self.cuisines.is_empty()
            && !self
                .cuisines
                .iter()
                .any(|cuisine| restaurant.cuisine_types.contains(cuisine))
        {
            return false;
        }

        if !self.price_range.is_empty() && !self.price_range.contains(&restaurant.price_range) {
            return false;
        }

        if let Some(min_rating) = self.min_rating {
            match restaurant.average_rating {
                Some(rating) if rating >= min_rating => {}
                _ => return false,
            }
        }

        if let Some(query) = &self.query {
            let query = query.to_lowercase();
            if !restaurant.name.to_lowercase().contains(&query)
                && !restaurant.description.to_lowercase().contains(&query)
                && !restaurant.city.to_lowercase().contains(&query)
                && !restaurant.address.to_lowercase().contains(&query)
            {
                return false;
            }
        }

        true
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchResponse {
    pub food_items: Vec<FoodItem>,
    pub restaurants: Vec<Restaurant>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TrendingResponse {
    pub trending_foods: Vec<FoodItem>,
    pub trending_restaurants: Vec<Restaurant>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TopRatedResponse {
    pub top_rated_foods: Vec<FoodItem>,
    pub top_rated_restaurants: Vec<Restaurant>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CreateFoodItemRequest;

    fn food(name: &str, cuisine: Cuisine) -> FoodItem {
        FoodItem::new(
            CreateFoodItemRequest {
                name: name.to_string(),
                description: "test dish".to_string(),
                cuisine,
                category: ItemCategory::Food,
                drink_type: None,
                dietary_preferences: vec![DietaryPreference::Vegetarian],
                meal_types: vec![MealType::Lunch],
                nutrition: None,
                ingredients: vec!["rice".to_string()],
                preparation_time_minutes: Some(15),
                image_url: None,
            },
            "tester".to_string(),
        )
    }

    #[test]
    fn test_time_of_day_maps_to_meal() {
        assert_eq!(TimeOfDay::Morning.meal_type(), MealType::Breakfast);
        assert_eq!(TimeOfDay::Afternoon.meal_type(), MealType::Lunch);
        assert_eq!(TimeOfDay::Evening.meal_type(), MealType::Dinner);
        assert_eq!("EVENING".parse::<TimeOfDay>().unwrap(), TimeOfDay::Evening);
    }

    #[test]
    fn test_search_cuisines_are_any_of() {
        let item = food("Bibimbap", Cuisine::Korean);

        let request = SearchRequest {
            cuisines: vec![Cuisine::Korean, Cuisine::Thai],
            ..Default::default()
        };
        assert!(request.matches_food(&item));

        let request = SearchRequest {
            cuisines: vec![Cuisine::Thai],
            ..Default::default()
        };
        assert!(!request.matches_food(&item));
    }

    #[test]
    fn test_search_min_rating_fails_unrated_items() {
        let item = food("Bibimbap", Cuisine::Korean);
        let request = SearchRequest {
            min_rating: Some(3.0),
            ..Default::default()
        };
        assert!(!request.matches_food(&item));

        let mut rated = food("Pad Thai", Cuisine::Thai);
        rated.average_rating = Some(4.5);
        assert!(request.matches_food(&rated));
    }

    #[test]
    fn test_search_query_covers_ingredients() {
        let item = food("Bibimbap", Cuisine::Korean);
        let request = SearchRequest {
            query: Some("RICE".to_string()),
            ..Default::default()
        };
        assert!(request.matches_food(&item));
    }
}
