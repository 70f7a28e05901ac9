use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;
use tracing::instrument;

use super::{ApiError, ApiResult, AppState};
use crate::models::{
    AuthUser, CreateFoodItemRequest, FoodItem, FoodItemFilters, FoodItemListResponse, Rating,
    RatingTarget, ReviewAnalytics, ServiceError, SortKey, UpdateFoodItemRequest,
};

/// Query parameters for listing food items. Multi-value filters arrive as
/// comma-separated lists.
#[derive(Debug, Default, Deserialize)]
pub struct FoodItemQuery {
    pub cuisine: Option<String>,
    pub dietary_preferences: Option<String>,
    pub meal_type: Option<String>,
    pub category: Option<String>,
    pub drink_type: Option<String>,
    pub max_calories: Option<u32>,
    pub max_preparation_time: Option<u32>,
    pub min_rating: Option<f64>,
    pub is_trending: Option<bool>,
    pub search: Option<String>,
    pub sort_by: Option<String>,
}

pub(super) fn parse_list<T: std::str::FromStr<Err = String>>(
    raw: &str,
) -> Result<Vec<T>, String> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::parse)
        .collect()
}

fn query_to_filters(query: FoodItemQuery) -> Result<(FoodItemFilters, SortKey), String> {
    let filters = FoodItemFilters {
        cuisine: query.cuisine.as_deref().map(str::parse).transpose()?,
        dietary_preferences: query
            .dietary_preferences
            .as_deref()
            .map(parse_list)
            .transpose()?
            .unwrap_or_default(),
        meal_type: query.meal_type.as_deref().map(str::parse).transpose()?,
        category: query.category.as_deref().map(str::parse).transpose()?,
        drink_type: query.drink_type.as_deref().map(str::parse).transpose()?,
        max_calories: query.max_calories,
        max_preparation_time: query.max_preparation_time,
        min_rating: query.min_rating,
        is_trending: query.is_trending,
        search: query.search,
    };
    let sort_by = query
        .sort_by
        .as_deref()
        .map(str::parse)
        .transpose()?
        .unwrap_or_default();
    Ok((filters, sort_by))
}

fn bad_request(message: String) -> ApiError {
    ApiError(ServiceError::ValidationError { message })
}

/// List food items with filters and a sort key
#[instrument(name = "list_food_items", skip(state, query))]
pub async fn list_food_items(
    State(state): State<AppState>,
    _caller: AuthUser,
    Query(query): Query<FoodItemQuery>,
) -> ApiResult<Json<FoodItemListResponse>> {
    let (filters, sort_by) = query_to_filters(query).map_err(bad_request)?;

    let result = state.food_service.list_food_items(filters, sort_by).await;
    state
        .metrics
        .record_catalog_query("food_items", &sort_by.to_string(), result.is_ok());

    Ok(Json(result?))
}

/// Get one food item
#[instrument(name = "get_food_item", skip(state), fields(food_item_id = %id))]
pub async fn get_food_item(
    State(state): State<AppState>,
    _caller: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<FoodItem>> {
    let item = state.food_service.get_food_item(&id).await?;
    Ok(Json(item))
}

/// Create a food item owned by the caller
#[instrument(name = "create_food_item", skip(state, caller, request), fields(name = %request.name))]
pub async fn create_food_item(
    State(state): State<AppState>,
    caller: AuthUser,
    Json(request): Json<CreateFoodItemRequest>,
) -> ApiResult<(StatusCode, Json<FoodItem>)> {
    let item = state.food_service.create_food_item(request, &caller).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// Update a food item. Creator or admin.
#[instrument(name = "update_food_item", skip(state, caller, request), fields(food_item_id = %id))]
pub async fn update_food_item(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<String>,
    Json(request): Json<UpdateFoodItemRequest>,
) -> ApiResult<Json<FoodItem>> {
    let item = state
        .food_service
        .update_food_item(&id, request, &caller)
        .await?;
    Ok(Json(item))
}

/// Delete a food item. Admin only.
#[instrument(name = "delete_food_item", skip(state, caller), fields(food_item_id = %id))]
pub async fn delete_food_item(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.food_service.delete_food_item(&id, &caller).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// All ratings for one food item
#[instrument(name = "food_item_ratings", skip(state), fields(food_item_id = %id))]
pub async fn food_item_ratings(
    State(state): State<AppState>,
    _caller: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<Rating>>> {
    let target = RatingTarget::FoodItem { food_item_id: id };
    let ratings = state.rating_service.ratings_for_target(&target).await?;
    Ok(Json(ratings))
}

/// Review analytics for one food item
#[instrument(name = "food_item_review_analytics", skip(state), fields(food_item_id = %id))]
pub async fn food_item_review_analytics(
    State(state): State<AppState>,
    _caller: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<ReviewAnalytics>> {
    let target = RatingTarget::FoodItem { food_item_id: id };
    let analytics = state.rating_service.review_analytics(&target).await?;
    Ok(Json(analytics))
}
