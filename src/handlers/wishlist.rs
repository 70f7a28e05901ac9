use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use tracing::instrument;

use super::{ApiResult, AppState};
use crate::models::{AuthUser, CreateWishlistRequest, WishlistEntryView, WishlistItem};

/// The caller's wishlist with resolved targets
#[instrument(name = "list_wishlist", skip(state, caller), fields(caller = %caller.username))]
pub async fn list_wishlist(
    State(state): State<AppState>,
    caller: AuthUser,
) -> ApiResult<Json<Vec<WishlistEntryView>>> {
    let entries = state.wishlist_service.list_entries(&caller).await?;
    Ok(Json(entries))
}

/// Save a food item or restaurant to the wishlist
#[instrument(name = "add_wishlist_entry", skip(state, caller, request), fields(caller = %caller.username))]
pub async fn add_wishlist_entry(
    State(state): State<AppState>,
    caller: AuthUser,
    Json(request): Json<CreateWishlistRequest>,
) -> ApiResult<(StatusCode, Json<WishlistItem>)> {
    let entry = state.wishlist_service.add_entry(request, &caller).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

/// Remove a wishlist entry. Owner only.
#[instrument(name = "remove_wishlist_entry", skip(state, caller), fields(wishlist_id = %id))]
pub async fn remove_wishlist_entry(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.wishlist_service.remove_entry(&id, &caller).await?;
    Ok(StatusCode::NO_CONTENT)
}
