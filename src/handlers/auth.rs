use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use super::{ApiError, AppState};
use crate::models::{AuthUser, ServiceError};

/// Extract the bearer token from the Authorization header and resolve it
/// through the session table. Handlers take `AuthUser` as an argument to
/// require a logged-in caller.
#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header_value = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(ApiError(ServiceError::Unauthenticated))?;

        let token = header_value
            .strip_prefix("Bearer ")
            .ok_or(ApiError(ServiceError::Unauthenticated))?;

        state
            .user_service
            .authenticate(token)
            .await
            .map_err(ApiError::from)
    }
}

/// An authenticated caller that must hold the admin role
pub struct AdminUser(pub AuthUser);

#[async_trait]
impl FromRequestParts<AppState> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !user.is_admin() {
            return Err(ApiError(ServiceError::Forbidden));
        }
        Ok(AdminUser(user))
    }
}
