use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::instrument;

use super::{AdminUser, ApiError, ApiResult, AppState};
use crate::models::{
    AuthUser, CreateRatingRequest, CreateReportRequest, CreateResponseRequest, CreateVoteRequest,
    Rating, RatingFilters, ReviewReport, ReviewResponse, ReviewVote, ServiceError,
    UpdateRatingRequest, UpdateReportRequest, VoteSummary,
};

const DEFAULT_PAGE_SIZE: usize = 20;

/// Query parameters for the advanced rating listing
#[derive(Debug, Default, Deserialize)]
pub struct RatingQuery {
    pub food_item_id: Option<String>,
    pub restaurant_id: Option<String>,
    pub min_rating: Option<f64>,
    pub max_rating: Option<f64>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub sort_by: Option<String>,
    pub has_response: Option<bool>,
    /// Comma-separated; a review matches when it contains ANY keyword
    pub keywords: Option<String>,
    pub skip: Option<usize>,
    pub limit: Option<usize>,
}

fn query_to_filters(query: RatingQuery) -> Result<RatingFilters, String> {
    Ok(RatingFilters {
        food_item_id: query.food_item_id,
        restaurant_id: query.restaurant_id,
        min_rating: query.min_rating,
        max_rating: query.max_rating,
        start_date: query.start_date,
        end_date: query.end_date,
        has_response: query.has_response,
        keywords: query
            .keywords
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|part| !part.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default(),
        sort_by: query
            .sort_by
            .as_deref()
            .map(str::parse)
            .transpose()?
            .unwrap_or_default(),
        skip: query.skip.unwrap_or(0),
        limit: query.limit.unwrap_or(DEFAULT_PAGE_SIZE),
    })
}

/// Create a rating for a food item or restaurant
#[instrument(name = "create_rating", skip(state, caller, request), fields(caller = %caller.username))]
pub async fn create_rating(
    State(state): State<AppState>,
    caller: AuthUser,
    Json(request): Json<CreateRatingRequest>,
) -> ApiResult<(StatusCode, Json<Rating>)> {
    let target_kind = if request.food_item_id.is_some() {
        "food_item"
    } else {
        "restaurant"
    };

    let result = state.rating_service.create_rating(request, &caller).await;
    state
        .metrics
        .record_rating_operation("create", target_kind, result.is_ok());

    Ok((StatusCode::CREATED, Json(result?)))
}

/// Advanced rating listing with filters, sorting and slicing
#[instrument(name = "list_ratings", skip(state, query))]
pub async fn list_ratings(
    State(state): State<AppState>,
    _caller: AuthUser,
    Query(query): Query<RatingQuery>,
) -> ApiResult<Json<Vec<Rating>>> {
    let filters = query_to_filters(query)
        .map_err(|message| ApiError(ServiceError::ValidationError { message }))?;
    let ratings = state.rating_service.list_ratings(filters).await?;
    Ok(Json(ratings))
}

/// The caller's own ratings
#[instrument(name = "my_ratings", skip(state, caller), fields(caller = %caller.username))]
pub async fn my_ratings(
    State(state): State<AppState>,
    caller: AuthUser,
) -> ApiResult<Json<Vec<Rating>>> {
    let ratings = state.rating_service.ratings_for_user(&caller.id).await?;
    Ok(Json(ratings))
}

/// Update a rating. Owner only.
#[instrument(name = "update_rating", skip(state, caller, request), fields(rating_id = %id))]
pub async fn update_rating(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<String>,
    Json(request): Json<UpdateRatingRequest>,
) -> ApiResult<Json<Rating>> {
    let result = state
        .rating_service
        .update_rating(&id, request, &caller)
        .await;
    state
        .metrics
        .record_rating_operation("update", "any", result.is_ok());
    Ok(Json(result?))
}

/// Delete a rating. Owner or admin.
#[instrument(name = "delete_rating", skip(state, caller), fields(rating_id = %id))]
pub async fn delete_rating(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let result = state.rating_service.delete_rating(&id, &caller).await;
    state
        .metrics
        .record_rating_operation("delete", "any", result.is_ok());
    result?;
    Ok(StatusCode::NO_CONTENT)
}

/// Vote a review helpful or unhelpful
#[instrument(name = "vote_on_rating", skip(state, caller, request), fields(rating_id = %id))]
pub async fn vote_on_rating(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<String>,
    Json(request): Json<CreateVoteRequest>,
) -> ApiResult<(StatusCode, Json<ReviewVote>)> {
    let vote = state
        .rating_service
        .vote_on_rating(&id, request, &caller)
        .await?;
    Ok((StatusCode::CREATED, Json(vote)))
}

/// Withdraw the caller's vote
#[instrument(name = "remove_vote", skip(state, caller), fields(rating_id = %id))]
pub async fn remove_vote(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.rating_service.remove_vote(&id, &caller).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Vote counts for a rating
#[instrument(name = "vote_summary", skip(state, caller), fields(rating_id = %id))]
pub async fn vote_summary(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<VoteSummary>> {
    let summary = state.rating_service.vote_summary(&id, &caller).await?;
    Ok(Json(summary))
}

/// Report a review for moderation
#[instrument(name = "report_rating", skip(state, caller, request), fields(rating_id = %id))]
pub async fn report_rating(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<String>,
    Json(request): Json<CreateReportRequest>,
) -> ApiResult<(StatusCode, Json<ReviewReport>)> {
    let report = state
        .rating_service
        .report_rating(&id, request, &caller)
        .await?;
    Ok((StatusCode::CREATED, Json(report)))
}

#[derive(Debug, Default, Deserialize)]
pub struct ReportQuery {
    pub status: Option<String>,
}

/// List reports for moderation. Admin only.
#[instrument(name = "list_reports", skip(state, query))]
pub async fn list_reports(
    State(state): State<AppState>,
    AdminUser(caller): AdminUser,
    Query(query): Query<ReportQuery>,
) -> ApiResult<Json<Vec<ReviewReport>>> {
    let status = query
        .status
        .as_deref()
        .map(str::parse)
        .transpose()
        .map_err(|message| ApiError(ServiceError::ValidationError { message }))?;
    let reports = state.rating_service.list_reports(status, &caller).await?;
    Ok(Json(reports))
}

/// Move a report through moderation. Admin only.
#[instrument(name = "update_report", skip(state, request), fields(report_id = %id))]
pub async fn update_report(
    State(state): State<AppState>,
    AdminUser(caller): AdminUser,
    Path(id): Path<String>,
    Json(request): Json<UpdateReportRequest>,
) -> ApiResult<Json<ReviewReport>> {
    let report = state
        .rating_service
        .update_report(&id, request, &caller)
        .await?;
    Ok(Json(report))
}

/// Attach the owner/admin response to a rating
#[instrument(name = "create_response", skip(state, caller, request), fields(rating_id = %id))]
pub async fn create_response(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<String>,
    Json(request): Json<CreateResponseRequest>,
) -> ApiResult<(StatusCode, Json<ReviewResponse>)> {
    let response = state
        .rating_service
        .create_response(&id, request, &caller)
        .await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// Rewrite the response. Author or admin.
#[instrument(name = "update_response", skip(state, caller, request), fields(rating_id = %id))]
pub async fn update_response(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<String>,
    Json(request): Json<CreateResponseRequest>,
) -> ApiResult<Json<ReviewResponse>> {
    let response = state
        .rating_service
        .update_response(&id, request, &caller)
        .await?;
    Ok(Json(response))
}

/// The response attached to a rating
#[instrument(name = "get_response", skip(state), fields(rating_id = %id))]
pub async fn get_response(
    State(state): State<AppState>,
    _caller: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<ReviewResponse>> {
    let response = state.rating_service.get_response(&id).await?;
    Ok(Json(response))
}

/// Remove the response. Author or admin.
#[instrument(name = "delete_response", skip(state, caller), fields(rating_id = %id))]
pub async fn delete_response(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.rating_service.delete_response(&id, &caller).await?;
    Ok(StatusCode::NO_CONTENT)
}
