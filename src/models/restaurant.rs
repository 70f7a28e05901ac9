use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use super::{Cuisine, PriceRange};

/// Restaurant catalog entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Restaurant {
    pub id: String,
    pub name: String,
    pub description: String,
    pub cuisine_types: Vec<Cuisine>,
    pub address: String,
    pub city: String,
    pub state: Option<String>,
    pub country: String,
    pub postal_code: String,
    pub phone: String,
    pub email: Option<String>,
    pub website: Option<String>,
    pub price_range: PriceRange,
    pub opening_hours: HashMap<String, String>,
    pub image_url: Option<String>,
    pub social_media: Option<HashMap<String, String>>,
    pub features: Option<Vec<String>>,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
    pub average_rating: Option<f64>,
    pub rating_count: usize,
    pub is_trending: bool,
    pub popularity_score: f64,
}

/// Request model for creating a restaurant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRestaurantRequest {
    pub name: String,
    pub description: String,
    pub cuisine_types: Vec<Cuisine>,
    pub address: String,
    pub city: String,
    pub state: Option<String>,
    pub country: String,
    pub postal_code: String,
    pub phone: String,
    pub email: Option<String>,
    pub website: Option<String>,
    pub price_range: PriceRange,
    #[serde(default)]
    pub opening_hours: HashMap<String, String>,
    pub image_url: Option<String>,
    pub social_media: Option<HashMap<String, String>>,
    pub features: Option<Vec<String>>,
}

/// Request model for updating a restaurant
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateRestaurantRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub cuisine_types: Option<Vec<Cuisine>>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub postal_code: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub price_range: Option<PriceRange>,
    pub opening_hours: Option<HashMap<String, String>>,
    pub image_url: Option<String>,
    pub social_media: Option<HashMap<String, String>>,
    pub features: Option<Vec<String>>,
}

/// Filters for querying restaurants, combined by logical AND
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RestaurantFilters {
    /// Matches restaurants serving ANY of the requested cuisines
    #[serde(default)]
    pub cuisines: Vec<Cuisine>,
    /// Matches restaurants in ANY of the requested price bands
    #[serde(default)]
    pub price_ranges: Vec<PriceRange>,
    pub min_rating: Option<f64>,
    pub is_trending: Option<bool>,
    /// Restaurant must advertise ALL requested features
    #[serde(default)]
    pub features: Vec<String>,
    pub search: Option<String>,
}

impl Restaurant {
    /// Create a new Restaurant with generated ID and timestamp
    pub fn new(request: CreateRestaurantRequest, created_by: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: request.name,
            description: request.description,
            cuisine_types: request.cuisine_types,
            address: request.address,
            city: request.city,
            state: request.state,
            country: request.country,
            postal_code: request.postal_code,
            phone: request.phone,
            email: request.email,
            website: request.website,
            price_range: request.price_range,
            opening_hours: request.opening_hours,
            image_url: request.image_url,
            social_media: request.social_media,
            features: request.features,
            created_at: Utc::now(),
            created_by,
            average_rating: None,
            rating_count: 0,
            is_trending: false,
            popularity_score: 0.0,
        }
    }

    /// Apply the provided fields of an update request
    pub fn update(&mut self, request: UpdateRestaurantRequest) {
        if let Some(name) = request.name {
            self.name = name;
        }
        if let Some(description) = request.description {
            self.description = description;
        }
        if let Some(cuisine_types) = request.cuisine_types {
            self.cuisine_types = cuisine_types;
        }
        if let Some(address) = request.address {
            self.address = address;
        }
        if let Some(city) = request.city {
            self.city = city;
        }
        if let Some(state) = request.state {
            self.state = Some(state);
        }
        if let Some(country) = request.country {
            self.country = country;
        }
        if let Some(postal_code) = request.postal_code {
            self.postal_code = postal_code;
        }
        if let Some(phone) = request.phone {
            self.phone = phone;
        }
        if let Some(email) = request.email {
            self.email = Some(email);
        }
        if let Some(website) = request.website {
            self.website = Some(website);
        }
        if let Some(price_range) = request.price_range {
            self.price_range = price_range;
        }
        if let Some(opening_hours) = request.opening_hours {
            self.opening_hours = opening_hours;
        }
        if let Some(image_url) = request.image_url {
            self.image_url = Some(image_url);
        }
        if let Some(social_media) = request.social_media {
            self.social_media = Some(social_media);
        }
        if let Some(features) = request.features {
            self.features = Some(features);
        }
    }

    /// Overwrite the derived rating fields after a rating write
    pub fn apply_rating_stats(&mut self, average_rating: Option<f64>, rating_count: usize) {
        self.average_rating = average_rating;
        self.rating_count = rating_count;
    }

    /// Check if the restaurant matches the given filters
    pub fn matches_filters(&self, filters: &RestaurantFilters) -> bool {
        if !filters.cuisines.is_empty()
            && !filters
                .cuisines
                .iter()
                .any(|cuisine| self.cuisine_types.contains(cuisine))
        {
            return false;
        }

        if !filters.price_ranges.is_empty() && !filters.price_ranges.contains(&self.price_range) {
            return false;
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

        if !filters.features.is_empty() {
            match &self.features {
                Some(own) => {
                    if !filters.features.iter().all(|feature| own.contains(feature)) {
                        return false;
                    }
                }
                None => return false,
            }
        }

        if let Some(search) = &filters.search {
            let search_lower = search.to_lowercase();
            if !self.name.to_lowercase().contains(&search_lower)
                && !self.description.to_lowercase().contains(&search_lower)
                && !self.city.to_lowercase().contains(&search_lower)
                && !self.address.to_lowercase().contains(&search_lower)
            {
                return false;
            }
        }

        true
    }
}
