use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{FoodItem, RatingTarget, Restaurant, ValidationError};

/// A saved food item or restaurant on a user's wishlist
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WishlistItem {
    pub id: String,
    pub user_id: String,
    #[serde(flatten)]
    pub target: RatingTarget,
    pub added_at: DateTime<Utc>,
}

impl WishlistItem {
    pub fn new(user_id: String, target: RatingTarget) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id,
            target,
            added_at: Utc::now(),
        }
    }
}

/// Request body for adding a wishlist entry; one-of pair on the wire
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateWishlistRequest {
    pub food_item_id: Option<String>,
    pub restaurant_id: Option<String>,
}

impl CreateWishlistRequest {
    pub fn target(&self) -> Result<RatingTarget, ValidationError> {
        RatingTarget::from_ids(self.food_item_id.clone(), self.restaurant_id.clone())
    }
}

/// Wishlist entry resolved against the catalog for listing
#[derive(Debug, Clone, Serialize)]
pub struct WishlistEntryView {
    pub id: String,
    pub added_at: DateTime<Utc>,
    #[serde(rename = "type")]
    pub entry_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub food_item: Option<FoodItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restaurant: Option<Restaurant>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wishlist_target_one_of() {
        let request = CreateWishlistRequest {
            food_item_id: Some("f1".to_string()),
            restaurant_id: None,
        };
        assert_eq!(
            request.target().unwrap(),
            RatingTarget::FoodItem {
                food_item_id: "f1".to_string()
            }
        );

        let request = CreateWishlistRequest {
            food_item_id: None,
            restaurant_id: None,
        };
        assert!(request.target().is_err());
    }

    #[test]
    fn test_wishlist_item_serializes_flat() {
        let item = WishlistItem::new(
            "u1".to_string(),
            RatingTarget::Restaurant {
                restaurant_id: "r1".to_string(),
            },
        );
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["restaurant_id"], "r1");
        assert_eq!(json["user_id"], "u1");
    }
}
