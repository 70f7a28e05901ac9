use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::services::ServeDir;

use crate::config::{AuthConfig, Config};
use crate::models::{RegisterRequest, ServiceError, ServiceResult, UserRole};
use crate::observability::{observability_middleware, Metrics, MetricsError};
use crate::repositories::{
    InMemoryFileRepository, InMemoryFoodItemRepository, InMemoryMenuRepository,
    InMemoryRatingRepository, InMemoryRestaurantRepository, InMemoryReviewRepository,
    InMemoryUserRepository, InMemoryWishlistRepository,
};
use crate::services::{
    FileService, FoodItemService, RatingService, RecommendationService, RestaurantService,
    UserService, WishlistService,
};

pub mod auth;
pub mod errors;
pub mod file;
pub mod food;
pub mod health;
pub mod metrics;
pub mod middleware;
pub mod rating;
pub mod recommendation;
pub mod reference;
pub mod restaurant;
pub mod user;
pub mod wishlist;

pub use auth::AdminUser;
pub use errors::{ApiError, ApiResult};
pub use health::health_check;
pub use metrics::metrics_handler;
pub use middleware::{cors_middleware, security_headers_middleware};

/// Shared application state: one Arc'd service per domain plus the metrics
/// registry. Everything behind the services is process-memory only.
#[derive(Clone)]
pub struct AppState {
    pub food_service: Arc<FoodItemService>,
    pub restaurant_service: Arc<RestaurantService>,
    pub rating_service: Arc<RatingService>,
    pub recommendation_service: Arc<RecommendationService>,
    pub wishlist_service: Arc<WishlistService>,
    pub user_service: Arc<UserService>,
    pub file_service: Arc<FileService>,
    pub metrics: Arc<Metrics>,
}

impl AppState {
    /// Wire up repositories and services from configuration
    pub fn new(config: &Config) -> Result<Self, MetricsError> {
        let metrics = Arc::new(Metrics::new()?);

        let food_repo = Arc::new(InMemoryFoodItemRepository::new());
        let restaurant_repo = Arc::new(InMemoryRestaurantRepository::new());
        let rating_repo = Arc::new(InMemoryRatingRepository::new());
        let review_repo = Arc::new(InMemoryReviewRepository::new());
        let menu_repo = Arc::new(InMemoryMenuRepository::new());
        let wishlist_repo = Arc::new(InMemoryWishlistRepository::new());
        let user_repo = Arc::new(InMemoryUserRepository::new());
        let file_repo = Arc::new(InMemoryFileRepository::new());

        let food_service = Arc::new(FoodItemService::new(food_repo.clone()));
        let restaurant_service = Arc::new(RestaurantService::new(
            restaurant_repo.clone(),
            menu_repo,
            food_repo.clone(),
        ));
        let rating_service = Arc::new(RatingService::new(
            rating_repo.clone(),
            review_repo,
            food_repo.clone(),
            restaurant_repo.clone(),
        ));
        let recommendation_service = Arc::new(RecommendationService::new(
            food_repo.clone(),
            restaurant_repo.clone(),
            wishlist_repo.clone(),
            rating_repo,
            user_repo.clone(),
        ));
        let wishlist_service = Arc::new(WishlistService::new(
            wishlist_repo,
            food_repo.clone(),
            restaurant_repo.clone(),
        ));
        let user_service = Arc::new(UserService::new(
            user_repo.clone(),
            config.auth.token_ttl(),
        ));
        let file_service = Arc::new(FileService::new(
            file_repo,
            food_repo,
            restaurant_repo,
            user_repo,
            config.uploads.clone(),
        ));

        Ok(Self {
            food_service,
            restaurant_service,
            rating_service,
            recommendation_service,
            wishlist_service,
            user_service,
            file_service,
            metrics,
        })
    }

    /// Create the bootstrap admin account. Idempotent across restarts of
    /// the same process.
    pub async fn bootstrap_admin(&self, auth: &AuthConfig) -> ServiceResult<()> {
        let request = RegisterRequest {
            email: auth.admin_email.clone(),
            username: auth.admin_username.clone(),
            full_name: Some("Administrator".to_string()),
            password: auth.admin_password.clone(),
            profile_picture: None,
            preferences: None,
        };

        match self.user_service.register(request, UserRole::Admin).await {
            Ok(_) | Err(ServiceError::UsernameTaken { .. }) => Ok(()),
            Err(e) => Err(e),
        }
    }
}

/// Build the application router. `upload_dir` backs the static file mount
/// under /files.
pub fn create_router(state: AppState, upload_dir: &str) -> Router {
    let metrics_for_middleware = state.metrics.clone();

    // Metadata routes take priority; anything else under /files falls
    // through to the on-disk category directories.
    let files_router = Router::new()
        .route("/", get(file::list_files))
        .route("/:id", get(file::get_file).delete(file::delete_file))
        .fallback_service(ServeDir::new(upload_dir));

    Router::new()
        // Ops
        .route("/health/status", get(health_check))
        .route("/metrics", get(metrics_handler))
        // Auth and accounts
        .route("/token", post(user::login))
        .route("/register", post(user::register))
        .route("/users/me", get(user::get_me).put(user::update_me))
        .route("/users", get(user::list_users).post(user::admin_create_user))
        // Reference data
        .route("/cuisines", get(reference::list_cuisines))
        .route(
            "/dietary-preferences",
            get(reference::list_dietary_preferences),
        )
        .route("/meal-types", get(reference::list_meal_types))
        .route("/price-ranges", get(reference::list_price_ranges))
        .route("/item-categories", get(reference::list_item_categories))
        .route("/drink-types", get(reference::list_drink_types))
        .route("/languages", get(reference::list_languages))
        // Food items
        .route(
            "/food-items",
            get(food::list_food_items).post(food::create_food_item),
        )
        .route(
            "/food-items/:id",
            get(food::get_food_item)
                .put(food::update_food_item)
                .delete(food::delete_food_item),
        )
        .route("/food-items/:id/ratings", get(food::food_item_ratings))
        .route(
            "/food-items/:id/review-analytics",
            get(food::food_item_review_analytics),
        )
        // Restaurants and menus
        .route(
            "/restaurants",
            get(restaurant::list_restaurants).post(restaurant::create_restaurant),
        )
        .route(
            "/restaurants/:id",
            get(restaurant::get_restaurant)
                .put(restaurant::update_restaurant)
                .delete(restaurant::delete_restaurant),
        )
        .route(
            "/restaurants/:id/menu",
            get(restaurant::get_menu).post(restaurant::add_menu_item),
        )
        .route(
            "/restaurants/:id/menu-sections",
            post(restaurant::add_menu_section),
        )
        .route("/menu-items/:id", axum::routing::delete(restaurant::delete_menu_item))
        .route("/restaurants/:id/ratings", get(restaurant::restaurant_ratings))
        .route(
            "/restaurants/:id/review-analytics",
            get(restaurant::restaurant_review_analytics),
        )
        // Ratings and review engagement
        .route(
            "/ratings",
            get(rating::list_ratings).post(rating::create_rating),
        )
        .route("/ratings/me", get(rating::my_ratings))
        .route(
            "/ratings/:id",
            put(rating::update_rating).delete(rating::delete_rating),
        )
        .route(
            "/ratings/:id/votes",
            get(rating::vote_summary)
                .post(rating::vote_on_rating)
                .delete(rating::remove_vote),
        )
        .route("/ratings/:id/report", post(rating::report_rating))
        .route(
            "/ratings/:id/response",
            get(rating::get_response)
                .post(rating::create_response)
                .put(rating::update_response)
                .delete(rating::delete_response),
        )
        .route("/admin/reports", get(rating::list_reports))
        .route("/admin/reports/:id", put(rating::update_report))
        // Wishlist
        .route(
            "/wishlist",
            get(wishlist::list_wishlist).post(wishlist::add_wishlist_entry),
        )
        .route(
            "/wishlist/:id",
            axum::routing::delete(wishlist::remove_wishlist_entry),
        )
        // Recommendations and search
        .route(
            "/recommendations",
            get(recommendation::get_recommendations).post(recommendation::post_recommendations),
        )
        .route("/trending", get(recommendation::get_trending))
        .route("/top-rated", get(recommendation::get_top_rated))
        .route("/random", get(recommendation::get_random_food))
        .route("/search", post(recommendation::search))
        // Uploads and files
        .route("/upload/food-image/:id", post(file::upload_food_image))
        .route(
            "/upload/restaurant-image/:id",
            post(file::upload_restaurant_image),
        )
        .route("/upload/user-image", post(file::upload_user_image))
        .route("/upload/menu-image/:id", post(file::upload_menu_image))
        .route("/upload/file", post(file::upload_file))
        .nest("/files", files_router)
        // Middleware layers, outer to inner
        .layer(axum::middleware::from_fn(security_headers_middleware))
        .layer(axum::middleware::from_fn(cors_middleware))
        .layer(axum::middleware::from_fn(move |req, next| {
            observability_middleware(metrics_for_middleware.clone(), req, next)
        }))
        .with_state(state)
}
