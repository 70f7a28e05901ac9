// Business logic per domain. Services own validation, authorization and
// the derived-field recomputation triggered by writes; repositories stay
// storage-only.
pub mod file_service;
pub mod food_service;
pub mod rating_service;
pub mod recommendation_service;
pub mod restaurant_service;
pub mod user_service;
pub mod wishlist_service;

pub use file_service::FileService;
pub use food_service::FoodItemService;
pub use rating_service::RatingService;
pub use recommendation_service::RecommendationService;
pub use restaurant_service::RestaurantService;
pub use user_service::UserService;
pub use wishlist_service::WishlistService;
