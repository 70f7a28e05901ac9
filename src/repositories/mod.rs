// Data access layer: one trait per aggregate with an in-memory
// implementation. State lives in process memory only and is lost on
// restart; every lookup is a linear scan over an insertion-ordered list.
pub mod file_repository;
pub mod food_item_repository;
pub mod menu_repository;
pub mod rating_repository;
pub mod restaurant_repository;
pub mod review_repository;
pub mod user_repository;
pub mod wishlist_repository;

pub use file_repository::{FileRepository, InMemoryFileRepository};
pub use food_item_repository::{FoodItemRepository, InMemoryFoodItemRepository};
pub use menu_repository::{InMemoryMenuRepository, MenuRepository};
pub use rating_repository::{InMemoryRatingRepository, RatingRepository};
pub use restaurant_repository::{InMemoryRestaurantRepository, RestaurantRepository};
pub use review_repository::{InMemoryReviewRepository, ReviewRepository};
pub use user_repository::{InMemoryUserRepository, UserRepository};
pub use wishlist_repository::{InMemoryWishlistRepository, WishlistRepository};
