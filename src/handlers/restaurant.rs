use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;
use tracing::instrument;

use super::food::parse_list;
use super::{ApiError, ApiResult, AppState};
use crate::models::{
    AuthUser, CreateMenuItemRequest, CreateMenuSectionRequest, CreateRestaurantRequest, MenuItem,
    MenuSection, MenuSectionView, Rating, RatingTarget, Restaurant, RestaurantFilters,
    ReviewAnalytics, ServiceError, SortKey, UpdateRestaurantRequest,
};

/// Query parameters for listing restaurants. Multi-value filters arrive as
/// comma-separated lists.
#[derive(Debug, Default, Deserialize)]
pub struct RestaurantQuery {
    pub cuisines: Option<String>,
    pub price_ranges: Option<String>,
    pub min_rating: Option<f64>,
    pub is_trending: Option<bool>,
    pub features: Option<String>,
    pub search: Option<String>,
    pub sort_by: Option<String>,
}

fn query_to_filters(query: RestaurantQuery) -> Result<(RestaurantFilters, SortKey), String> {
    let filters = RestaurantFilters {
        cuisines: query
            .cuisines
            .as_deref()
            .map(parse_list)
            .transpose()?
            .unwrap_or_default(),
        price_ranges: query
            .price_ranges
            .as_deref()
            .map(parse_list)
            .transpose()?
            .unwrap_or_default(),
        min_rating: query.min_rating,
        is_trending: query.is_trending,
        features: query
            .features
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|part| !part.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default(),
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

/// List restaurants with filters and a sort key
#[instrument(name = "list_restaurants", skip(state, query))]
pub async fn list_restaurants(
    State(state): State<AppState>,
    _caller: AuthUser,
    Query(query): Query<RestaurantQuery>,
) -> ApiResult<Json<Vec<Restaurant>>> {
    let (filters, sort_by) = query_to_filters(query)
        .map_err(|message| ApiError(ServiceError::ValidationError { message }))?;

    let result = state
        .restaurant_service
        .list_restaurants(filters, sort_by)
        .await;
    state
        .metrics
        .record_catalog_query("restaurants", &sort_by.to_string(), result.is_ok());

    Ok(Json(result?))
}

/// Get one restaurant
#[instrument(name = "get_restaurant", skip(state), fields(restaurant_id = %id))]
pub async fn get_restaurant(
    State(state): State<AppState>,
    _caller: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<Restaurant>> {
    let restaurant = state.restaurant_service.get_restaurant(&id).await?;
    Ok(Json(restaurant))
}

/// Create a restaurant. Admin only.
#[instrument(name = "create_restaurant", skip(state, caller, request), fields(name = %request.name))]
pub async fn create_restaurant(
    State(state): State<AppState>,
    caller: AuthUser,
    Json(request): Json<CreateRestaurantRequest>,
) -> ApiResult<(StatusCode, Json<Restaurant>)> {
    let restaurant = state
        .restaurant_service
        .create_restaurant(request, &caller)
        .await?;
    Ok((StatusCode::CREATED, Json(restaurant)))
}

/// Update a restaurant. Admin only.
#[instrument(name = "update_restaurant", skip(state, caller, request), fields(restaurant_id = %id))]
pub async fn update_restaurant(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<String>,
    Json(request): Json<UpdateRestaurantRequest>,
) -> ApiResult<Json<Restaurant>> {
    let restaurant = state
        .restaurant_service
        .update_restaurant(&id, request, &caller)
        .await?;
    Ok(Json(restaurant))
}

/// Delete a restaurant. Admin only.
#[instrument(name = "delete_restaurant", skip(state, caller), fields(restaurant_id = %id))]
pub async fn delete_restaurant(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state
        .restaurant_service
        .delete_restaurant(&id, &caller)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// The restaurant's menu: sections with resolved items
#[instrument(name = "get_menu", skip(state), fields(restaurant_id = %id))]
pub async fn get_menu(
    State(state): State<AppState>,
    _caller: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<MenuSectionView>>> {
    let menu = state.restaurant_service.get_menu(&id).await?;
    Ok(Json(menu))
}

/// Put a food item on the menu. Admin only.
#[instrument(name = "add_menu_item", skip(state, caller, request), fields(restaurant_id = %id))]
pub async fn add_menu_item(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<String>,
    Json(request): Json<CreateMenuItemRequest>,
) -> ApiResult<(StatusCode, Json<MenuItem>)> {
    let item = state
        .restaurant_service
        .add_menu_item(&id, request, &caller)
        .await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// Add a menu section. Admin only.
#[instrument(name = "add_menu_section", skip(state, caller, request), fields(restaurant_id = %id))]
pub async fn add_menu_section(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<String>,
    Json(request): Json<CreateMenuSectionRequest>,
) -> ApiResult<(StatusCode, Json<MenuSection>)> {
    let section = state
        .restaurant_service
        .add_menu_section(&id, request, &caller)
        .await?;
    Ok((StatusCode::CREATED, Json(section)))
}

/// Remove a menu item. Admin only.
#[instrument(name = "delete_menu_item", skip(state, caller), fields(menu_item_id = %id))]
pub async fn delete_menu_item(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state
        .restaurant_service
        .delete_menu_item(&id, &caller)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// All ratings for one restaurant
#[instrument(name = "restaurant_ratings", skip(state), fields(restaurant_id = %id))]
pub async fn restaurant_ratings(
    State(state): State<AppState>,
    _caller: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<Rating>>> {
    let target = RatingTarget::Restaurant { restaurant_id: id };
    let ratings = state.rating_service.ratings_for_target(&target).await?;
    Ok(Json(ratings))
}

/// Review analytics for one restaurant
#[instrument(name = "restaurant_review_analytics", skip(state), fields(restaurant_id = %id))]
pub async fn restaurant_review_analytics(
    State(state): State<AppState>,
    _caller: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<ReviewAnalytics>> {
    let target = RatingTarget::Restaurant { restaurant_id: id };
    let analytics = state.rating_service.review_analytics(&target).await?;
    Ok(Json(analytics))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Cuisine, PriceRange};

    #[test]
    fn test_query_to_filters_parses_lists() {
        let query = RestaurantQuery {
            cuisines: Some("italian,thai".to_string()),
            price_ranges: Some("$,$$".to_string()),
            features: Some("Takeout, Delivery".to_string()),
            sort_by: Some("rating".to_string()),
            ..Default::default()
        };

        let (filters, sort_by) = query_to_filters(query).unwrap();
        assert_eq!(filters.cuisines, vec![Cuisine::Italian, Cuisine::Thai]);
        assert_eq!(
            filters.price_ranges,
            vec![PriceRange::Inexpensive, PriceRange::Moderate]
        );
        assert_eq!(filters.features, vec!["Takeout", "Delivery"]);
        assert_eq!(sort_by, SortKey::Rating);
    }

    #[test]
    fn test_query_to_filters_rejects_bad_price_band() {
        let query = RestaurantQuery {
            price_ranges: Some("$$$$$".to_string()),
            ..Default::default()
        };
        assert!(query_to_filters(query).is_err());
    }
}
