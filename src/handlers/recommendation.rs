use axum::{
    extract::{Query, State},
    response::Json,
};
use serde::Deserialize;
use tracing::instrument;

use super::{ApiError, ApiResult, AppState};
use crate::models::{
    AuthUser, FoodItem, RecommendationRequest, RecommendationResponse, SearchRequest,
    SearchResponse, ServiceError, TopRatedResponse, TrendingResponse,
};

const DEFAULT_RECOMMENDATION_LIMIT: usize = 5;

/// Query parameters for GET /recommendations
#[derive(Debug, Default, Deserialize)]
pub struct RecommendationQuery {
    pub cuisine: Option<String>,
    pub dietary_preferences: Option<String>,
    pub meal_type: Option<String>,
    pub category: Option<String>,
    pub max_calories: Option<u32>,
    pub max_preparation_time: Option<u32>,
    pub time_of_day: Option<String>,
    pub sort_by: Option<String>,
    pub limit: Option<usize>,
}

fn query_to_request(query: &RecommendationQuery) -> Result<RecommendationRequest, String> {
    Ok(RecommendationRequest {
        cuisine: query.cuisine.as_deref().map(str::parse).transpose()?,
        dietary_preferences: query
            .dietary_preferences
            .as_deref()
            .map(super::food::parse_list)
            .transpose()?
            .unwrap_or_default(),
        meal_type: query.meal_type.as_deref().map(str::parse).transpose()?,
        category: query.category.as_deref().map(str::parse).transpose()?,
        max_calories: query.max_calories,
        max_preparation_time: query.max_preparation_time,
        time_of_day: query.time_of_day.as_deref().map(str::parse).transpose()?,
        previous_liked: Vec::new(),
        sort_by: query
            .sort_by
            .as_deref()
            .map(str::parse)
            .transpose()?
            .unwrap_or_default(),
    })
}

/// Recommendations personalized from the caller's profile and history
#[instrument(name = "get_recommendations", skip(state, caller, query), fields(caller = %caller.username))]
pub async fn get_recommendations(
    State(state): State<AppState>,
    caller: AuthUser,
    Query(query): Query<RecommendationQuery>,
) -> ApiResult<Json<RecommendationResponse>> {
    let limit = query.limit.unwrap_or(DEFAULT_RECOMMENDATION_LIMIT);
    let request = query_to_request(&query)
        .map_err(|message| ApiError(ServiceError::ValidationError { message }))?;

    let result = state
        .recommendation_service
        .recommend_for_user(request, limit, &caller)
        .await;
    state
        .metrics
        .record_recommendation_request("profile", result.is_ok());

    Ok(Json(result?))
}

#[derive(Debug, Default, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<usize>,
}

/// Recommendations driven by an explicit liked-item history
#[instrument(name = "post_recommendations", skip(state, caller, request), fields(caller = %caller.username))]
pub async fn post_recommendations(
    State(state): State<AppState>,
    caller: AuthUser,
    Query(query): Query<LimitQuery>,
    Json(request): Json<RecommendationRequest>,
) -> ApiResult<Json<RecommendationResponse>> {
    let limit = query.limit.unwrap_or(DEFAULT_RECOMMENDATION_LIMIT);

    let result = state
        .recommendation_service
        .recommend_from_liked(request, limit, &caller)
        .await;
    state
        .metrics
        .record_recommendation_request("liked", result.is_ok());

    Ok(Json(result?))
}

/// Trending food items and restaurants
#[instrument(name = "get_trending", skip(state))]
pub async fn get_trending(
    State(state): State<AppState>,
    _caller: AuthUser,
) -> ApiResult<Json<TrendingResponse>> {
    let trending = state.recommendation_service.trending().await?;
    Ok(Json(trending))
}

/// Top-rated food items and restaurants
#[instrument(name = "get_top_rated", skip(state))]
pub async fn get_top_rated(
    State(state): State<AppState>,
    _caller: AuthUser,
) -> ApiResult<Json<TopRatedResponse>> {
    let top_rated = state.recommendation_service.top_rated().await?;
    Ok(Json(top_rated))
}

/// A random food item
#[instrument(name = "get_random_food", skip(state))]
pub async fn get_random_food(
    State(state): State<AppState>,
    _caller: AuthUser,
) -> ApiResult<Json<FoodItem>> {
    let item = state.recommendation_service.random_food().await?;
    Ok(Json(item))
}

/// Combined food + restaurant search
#[instrument(name = "search", skip(state, request))]
pub async fn search(
    State(state): State<AppState>,
    _caller: AuthUser,
    Json(request): Json<SearchRequest>,
) -> ApiResult<Json<SearchResponse>> {
    let response = state.recommendation_service.search(request).await?;
    Ok(Json(response))
}
