// Re-export all model types
pub use self::enums::*;
pub use self::errors::*;
pub use self::file::*;
pub use self::food::*;
pub use self::menu::*;
pub use self::rating::*;
pub use self::recommendation::*;
pub use self::restaurant::*;
pub use self::user::*;
pub use self::validation::*;
pub use self::wishlist::*;

mod enums;
mod errors;
mod file;
mod food;
mod menu;
mod rating;
mod recommendation;
mod restaurant;
mod user;
mod validation;
mod wishlist;
