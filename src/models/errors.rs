use thiserror::Error;

/// Service-level errors that can occur in business logic
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Food item not found: {id}")]
    FoodItemNotFound { id: String },

    #[error("Restaurant not found: {id}")]
    RestaurantNotFound { id: String },

    #[error("Rating not found: {id}")]
    RatingNotFound { id: String },

    #[error("Menu item not found: {id}")]
    MenuItemNotFound { id: String },

    #[error("Wishlist item not found: {id}")]
    WishlistItemNotFound { id: String },

    #[error("Report not found: {id}")]
    ReportNotFound { id: String },

    #[error("No response exists for rating {rating_id}")]
    ResponseNotFound { rating_id: String },

    #[error("You have not voted on this rating")]
    VoteNotFound { rating_id: String },

    #[error("User not found: {username}")]
    UserNotFound { username: String },

    #[error("File not found: {id}")]
    FileNotFound { id: String },

    #[error("No reviews found for {target_id}")]
    NoReviews { target_id: String },

    #[error("No food items in the catalog")]
    EmptyCatalog,

    #[error("You have already rated this item")]
    DuplicateRating { user_id: String, target_id: String },

    #[error("You have already voted on this rating")]
    DuplicateVote { user_id: String, rating_id: String },

    #[error("You have already reported this rating")]
    DuplicateReport { user_id: String, rating_id: String },

    #[error("A response already exists for this rating")]
    DuplicateResponse { rating_id: String },

    #[error("Item already in wishlist")]
    DuplicateWishlistEntry { user_id: String, target_id: String },

    #[error("Username already registered: {username}")]
    UsernameTaken { username: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Incorrect username or password")]
    InvalidCredentials,

    #[error("Could not validate credentials")]
    Unauthenticated,

    #[error("Not enough permissions")]
    Forbidden,

    #[error("File size {size} exceeds the maximum allowed size of {max} bytes")]
    FileTooLarge { size: u64, max: u64 },

    #[error("File type {extension} not allowed for category {category}")]
    UnsupportedFileType { extension: String, category: String },

    #[error("Repository error: {source}")]
    Repository {
        #[from]
        source: RepositoryError,
    },
}

/// Repository-level errors for data access operations
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Item not found")]
    NotFound,

    #[error("Constraint violation: {message}")]
    ConstraintViolation { message: String },

    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },

    #[error("Storage I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

/// Validation errors for input data
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Required field missing: {field}")]
    RequiredField { field: String },

    #[error("Invalid field value: {field}={value}, reason={reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Field too long: {field}, max_length={max_length}, actual_length={actual_length}")]
    TooLong {
        field: String,
        max_length: usize,
        actual_length: usize,
    },

    #[error("Field too short: {field}, min_length={min_length}, actual_length={actual_length}")]
    TooShort {
        field: String,
        min_length: usize,
        actual_length: usize,
    },

    #[error("Value out of range: {field}, min={min}, max={max}, value={value}")]
    OutOfRange {
        field: String,
        min: String,
        max: String,
        value: String,
    },

    #[error("Exactly one of food_item_id or restaurant_id must be provided")]
    AmbiguousTarget,
}

impl From<ValidationError> for ServiceError {
    fn from(err: ValidationError) -> Self {
        ServiceError::ValidationError {
            message: err.to_string(),
        }
    }
}

/// Result type alias for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Result type alias for repository operations
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Result type alias for validation operations
pub type ValidationResult<T> = Result<T, ValidationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = ServiceError::FoodItemNotFound {
            id: "f-001".to_string(),
        };
        assert_eq!(error.to_string(), "Food item not found: f-001");

        let validation_error = ValidationError::RequiredField {
            field: "name".to_string(),
        };
        assert_eq!(
            validation_error.to_string(),
            "Required field missing: name"
        );
    }

    #[test]
    fn test_validation_error_conversion() {
        let validation_error = ValidationError::OutOfRange {
            field: "rating".to_string(),
            min: "1".to_string(),
            max: "5".to_string(),
            value: "7".to_string(),
        };

        let service_error: ServiceError = validation_error.into();
        match service_error {
            ServiceError::ValidationError { message } => {
                assert!(message.contains("rating"));
            }
            _ => panic!("Expected ValidationError conversion"),
        }
    }

    #[test]
    fn test_repository_error_from_serde() {
        let json_error = serde_json::from_str::<serde_json::Value>("not json");
        let repo_error: RepositoryError = json_error.unwrap_err().into();
        match repo_error {
            RepositoryError::Serialization { .. } => {}
            _ => panic!("Expected Serialization error"),
        }
    }
}
