use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    Form,
};
use tracing::instrument;

use super::{AdminUser, ApiResult, AppState};
use crate::models::{
    AuthUser, LoginRequest, RegisterRequest, TokenResponse, UpdateUserRequest, User, UserRole,
};

/// Exchange form credentials for a bearer token
#[instrument(name = "login", skip(state, request), fields(username = %request.username))]
pub async fn login(
    State(state): State<AppState>,
    Form(request): Form<LoginRequest>,
) -> ApiResult<Json<TokenResponse>> {
    let token = state.user_service.login(request).await?;
    Ok(Json(token))
}

/// Self-service registration, always with the user role
#[instrument(name = "register", skip(state, request), fields(username = %request.username))]
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<User>)> {
    let user = state.user_service.register(request, UserRole::User).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// The caller's own profile
#[instrument(name = "get_me", skip(state, caller), fields(username = %caller.username))]
pub async fn get_me(
    State(state): State<AppState>,
    caller: AuthUser,
) -> ApiResult<Json<User>> {
    let user = state.user_service.get_profile(&caller.id).await?;
    Ok(Json(user))
}

/// Partial update of the caller's profile
#[instrument(name = "update_me", skip(state, caller, request), fields(username = %caller.username))]
pub async fn update_me(
    State(state): State<AppState>,
    caller: AuthUser,
    Json(request): Json<UpdateUserRequest>,
) -> ApiResult<Json<User>> {
    let user = state.user_service.update_profile(&caller.id, request).await?;
    Ok(Json(user))
}

/// Admin-created account
#[instrument(name = "admin_create_user", skip(state, request), fields(username = %request.username))]
pub async fn admin_create_user(
    State(state): State<AppState>,
    AdminUser(_caller): AdminUser,
    Json(request): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<User>)> {
    let user = state.user_service.register(request, UserRole::User).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// All profiles. Admin only.
#[instrument(name = "list_users", skip(state))]
pub async fn list_users(
    State(state): State<AppState>,
    AdminUser(_caller): AdminUser,
) -> ApiResult<Json<Vec<User>>> {
    let users = state.user_service.list_users().await?;
    Ok(Json(users))
}
