use rand::seq::IndexedRandom;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{info, instrument};

use crate::models::{
    AuthUser, Cuisine, FoodItem, FoodItemFilters, RecommendationRequest, RecommendationResponse,
    SearchRequest, SearchResponse, ServiceError, ServiceResult, SortKey, TopRatedResponse,
    TrendingResponse,
};
use crate::query;
use crate::repositories::{
    FoodItemRepository, RatingRepository, RestaurantRepository, UserRepository,
    WishlistRepository,
};

/// Highly-rated threshold feeding the affinity reorder
const AFFINITY_RATING_THRESHOLD: f64 = 4.0;

const TRENDING_LIMIT: usize = 10;
const TOP_RATED_LIMIT: usize = 10;

/// Recommendation, trending, top-rated and combined-search queries over the
/// catalog. All personalization reduces to a preferred-cuisine set and a
/// stable partition; there is no scoring model.
pub struct RecommendationService {
    food_items: Arc<dyn FoodItemRepository>,
    restaurants: Arc<dyn RestaurantRepository>,
    wishlist: Arc<dyn WishlistRepository>,
    ratings: Arc<dyn RatingRepository>,
    users: Arc<dyn UserRepository>,
}

impl RecommendationService {
    pub fn new(
        food_items: Arc<dyn FoodItemRepository>,
        restaurants: Arc<dyn RestaurantRepository>,
        wishlist: Arc<dyn WishlistRepository>,
        ratings: Arc<dyn RatingRepository>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            food_items,
            restaurants,
            wishlist,
            ratings,
            users,
        }
    }

    /// Recommendations personalized from the caller's profile, wishlist and
    /// past high ratings
    #[instrument(skip(self, request), fields(caller = %caller.username, limit = limit))]
    pub async fn recommend_for_user(
        &self,
        request: RecommendationRequest,
        limit: usize,
        caller: &AuthUser,
    ) -> ServiceResult<RecommendationResponse> {
        let mut matched = self.filter_candidates(&request, caller).await?;

        if request.sort_by == SortKey::Relevance {
            // Favorite cuisines first, then cuisines learned from the
            // wishlist and highly-rated history; the later partition wins,
            // with the earlier one as a stable tiebreak inside it.
            if request.cuisine.is_none() {
                let favorites = self.favorite_cuisines(caller).await?;
                query::affinity_reorder(&mut matched, &favorites);
            }
            let history = self.history_cuisines(caller).await?;
            query::affinity_reorder(&mut matched, &history);
        }

        Ok(Self::sample(matched, limit))
    }

    /// Recommendations driven by an explicit list of previously liked items
    #[instrument(skip(self, request), fields(caller = %caller.username, limit = limit))]
    pub async fn recommend_from_liked(
        &self,
        request: RecommendationRequest,
        limit: usize,
        caller: &AuthUser,
    ) -> ServiceResult<RecommendationResponse> {
        let mut matched = self.filter_candidates(&request, caller).await?;

        if request.sort_by == SortKey::Relevance && !request.previous_liked.is_empty() {
            let liked = self.cuisines_of(&request.previous_liked).await?;
            query::affinity_reorder(&mut matched, &liked);
        }

        Ok(Self::sample(matched, limit))
    }

    /// Trending food items and restaurants by popularity score
    #[instrument(skip(self))]
    pub async fn trending(&self) -> ServiceResult<TrendingResponse> {
        let mut foods: Vec<FoodItem> = self
            .food_items
            .find_all()
            .await?
            .into_iter()
            .filter(|item| item.is_trending)
            .collect();
        foods.sort_by(|a, b| {
            b.popularity_score
                .partial_cmp(&a.popularity_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        foods.truncate(TRENDING_LIMIT);

        let mut restaurants: Vec<_> = self
            .restaurants
            .find_all()
            .await?
            .into_iter()
            .filter(|restaurant| restaurant.is_trending)
            .collect();
        restaurants.sort_by(|a, b| {
            b.popularity_score
                .partial_cmp(&a.popularity_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        restaurants.truncate(TRENDING_LIMIT);

        Ok(TrendingResponse {
            trending_foods: foods,
            trending_restaurants: restaurants,
        })
    }

    /// Top-rated food items and restaurants, ranked by (average, count)
    #[instrument(skip(self))]
    pub async fn top_rated(&self) -> ServiceResult<TopRatedResponse> {
        let mut foods: Vec<FoodItem> = self
            .food_items
            .find_all()
            .await?
            .into_iter()
            .filter(|item| item.average_rating.is_some())
            .collect();
        foods.sort_by(|a, b| {
            b.average_rating
                .partial_cmp(&a.average_rating)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| b.rating_count.cmp(&a.rating_count))
        });
        foods.truncate(TOP_RATED_LIMIT);

        let mut restaurants: Vec<_> = self
            .restaurants
            .find_all()
            .await?
            .into_iter()
            .filter(|restaurant| restaurant.average_rating.is_some())
            .collect();
        restaurants.sort_by(|a, b| {
            b.average_rating
                .partial_cmp(&a.average_rating)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| b.rating_count.cmp(&a.rating_count))
        });
        restaurants.truncate(TOP_RATED_LIMIT);

        Ok(TopRatedResponse {
            top_rated_foods: foods,
            top_rated_restaurants: restaurants,
        })
    }

    /// A uniformly random food item from the catalog
    #[instrument(skip(self))]
    pub async fn random_food(&self) -> ServiceResult<FoodItem> {
        let items = self.food_items.find_all().await?;
        let mut rng = rand::rng();
        items
            .choose(&mut rng)
            .cloned()
            .ok_or(ServiceError::EmptyCatalog)
    }

    /// Combined food + restaurant search
    #[instrument(skip(self, request))]
    pub async fn search(&self, request: SearchRequest) -> ServiceResult<SearchResponse> {
        let mut food_items: Vec<FoodItem> = self
            .food_items
            .find_all()
            .await?
            .into_iter()
            .filter(|item| request.matches_food(item))
            .collect();
        query::sort_items(&mut food_items, request.sort_by);

        let mut restaurants: Vec<_> = self
            .restaurants
            .find_all()
            .await?
            .into_iter()
            .filter(|restaurant| request.matches_restaurant(restaurant))
            .collect();
        query::sort_items(&mut restaurants, request.sort_by);

        info!(
            "Search matched {} food items and {} restaurants",
            food_items.len(),
            restaurants.len()
        );

        Ok(SearchResponse {
            food_items,
            restaurants,
        })
    }

    /// Apply the request's filters plus the profile dietary fallback and
    /// time-of-day meal mapping, sorted by the requested key
    async fn filter_candidates(
        &self,
        request: &RecommendationRequest,
        caller: &AuthUser,
    ) -> ServiceResult<Vec<FoodItem>> {
        let mut filters = FoodItemFilters {
            cuisine: request.cuisine,
            dietary_preferences: request.dietary_preferences.clone(),
            meal_type: request.meal_type,
            category: request.category,
            max_calories: request.max_calories,
            max_preparation_time: request.max_preparation_time,
            ..Default::default()
        };

        // Fall back to the profile's dietary preferences when the request
        // carries none
        if filters.dietary_preferences.is_empty() {
            if let Some(stored) = self.users.find_by_id(&caller.id).await? {
                filters.dietary_preferences = stored.user.preferences.dietary_preferences;
            }
        }

        let meal_for_time = request.time_of_day.map(|time| time.meal_type());

        let items = self.food_items.find_all().await?;
        let matched = query::query(
            items,
            |item| {
                item.matches_filters(&filters)
                    && meal_for_time.map_or(true, |meal| item.meal_types.contains(&meal))
            },
            request.sort_by,
        );
        Ok(matched)
    }

    async fn favorite_cuisines(&self, caller: &AuthUser) -> ServiceResult<HashSet<Cuisine>> {
        Ok(self
            .users
            .find_by_id(&caller.id)
            .await?
            .map(|stored| stored.user.preferences.favorite_cuisines.into_iter().collect())
            .unwrap_or_default())
    }

    /// Cuisines of wishlisted food items plus food items the caller rated
    /// at or above the affinity threshold
    async fn history_cuisines(&self, caller: &AuthUser) -> ServiceResult<HashSet<Cuisine>> {
        let mut food_ids: Vec<String> = self
            .wishlist
            .find_by_user(&caller.id)
            .await?
            .into_iter()
            .filter_map(|entry| entry.target.food_item_id().map(str::to_string))
            .collect();

        food_ids.extend(
            self.ratings
                .find_by_user(&caller.id)
                .await?
                .into_iter()
                .filter(|rating| rating.value >= AFFINITY_RATING_THRESHOLD)
                .filter_map(|rating| rating.target.food_item_id().map(str::to_string)),
        );

        self.cuisines_of(&food_ids).await
    }

    async fn cuisines_of(&self, food_ids: &[String]) -> ServiceResult<HashSet<Cuisine>> {
        let mut cuisines = HashSet::new();
        for id in food_ids {
            if let Some(item) = self.food_items.find_by_id(id).await? {
                cuisines.insert(item.cuisine);
            }
        }
        Ok(cuisines)
    }

    fn sample(matched: Vec<FoodItem>, limit: usize) -> RecommendationResponse {
        let mut rng = rand::rng();
        let selected = query::sample_with_head(matched, limit, &mut rng);
        RecommendationResponse {
            count: selected.len(),
            recommendations: selected,
        }
    }
}
