use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;

use crate::models::{RepositoryError, ServiceError};

/// Service error carried to the HTTP edge. Maps each error class onto a
/// status code and the standard `{"error", "timestamp"}` body.
pub struct ApiError(pub ServiceError);

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        ApiError(err)
    }
}

impl From<crate::models::ValidationError> for ApiError {
    fn from(err: crate::models::ValidationError) -> Self {
        ApiError(ServiceError::from(err))
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            ServiceError::FoodItemNotFound { .. }
            | ServiceError::RestaurantNotFound { .. }
            | ServiceError::RatingNotFound { .. }
            | ServiceError::MenuItemNotFound { .. }
            | ServiceError::WishlistItemNotFound { .. }
            | ServiceError::ReportNotFound { .. }
            | ServiceError::ResponseNotFound { .. }
            | ServiceError::VoteNotFound { .. }
            | ServiceError::UserNotFound { .. }
            | ServiceError::FileNotFound { .. }
            | ServiceError::NoReviews { .. }
            | ServiceError::EmptyCatalog => StatusCode::NOT_FOUND,

            ServiceError::DuplicateRating { .. }
            | ServiceError::DuplicateVote { .. }
            | ServiceError::DuplicateReport { .. }
            | ServiceError::DuplicateResponse { .. }
            | ServiceError::DuplicateWishlistEntry { .. }
            | ServiceError::UsernameTaken { .. } => StatusCode::CONFLICT,

            ServiceError::ValidationError { .. } => StatusCode::BAD_REQUEST,

            ServiceError::InvalidCredentials | ServiceError::Unauthenticated => {
                StatusCode::UNAUTHORIZED
            }
            ServiceError::Forbidden => StatusCode::FORBIDDEN,

            ServiceError::FileTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            ServiceError::UnsupportedFileType { .. } => StatusCode::UNSUPPORTED_MEDIA_TYPE,

            ServiceError::Repository { source } => match source {
                RepositoryError::NotFound => StatusCode::NOT_FOUND,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
        };

        let body = json!({
            "error": self.0.to_string(),
            "timestamp": chrono::Utc::now().to_rfc3339(),
        });

        (status, Json(body)).into_response()
    }
}
