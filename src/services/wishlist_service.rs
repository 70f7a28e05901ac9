use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::models::{
    AuthUser, CreateWishlistRequest, RatingTarget, ServiceError, ServiceResult, WishlistEntryView,
    WishlistItem,
};
use crate::repositories::{FoodItemRepository, RestaurantRepository, WishlistRepository};

/// Service for per-user wishlists over food items and restaurants
pub struct WishlistService {
    wishlist: Arc<dyn WishlistRepository>,
    food_items: Arc<dyn FoodItemRepository>,
    restaurants: Arc<dyn RestaurantRepository>,
}

impl WishlistService {
    pub fn new(
        wishlist: Arc<dyn WishlistRepository>,
        food_items: Arc<dyn FoodItemRepository>,
        restaurants: Arc<dyn RestaurantRepository>,
    ) -> Self {
        Self {
            wishlist,
            food_items,
            restaurants,
        }
    }

    /// Save a food item or restaurant. One entry per (user, target).
    #[instrument(skip(self, request), fields(caller = %caller.username))]
    pub async fn add_entry(
        &self,
        request: CreateWishlistRequest,
        caller: &AuthUser,
    ) -> ServiceResult<WishlistItem> {
        let target = request.target()?;

        match &target {
            RatingTarget::FoodItem { food_item_id } => {
                if !self.food_items.exists(food_item_id).await? {
                    return Err(ServiceError::FoodItemNotFound {
                        id: food_item_id.clone(),
                    });
                }
            }
            RatingTarget::Restaurant { restaurant_id } => {
                if self.restaurants.find_by_id(restaurant_id).await?.is_none() {
                    return Err(ServiceError::RestaurantNotFound {
                        id: restaurant_id.clone(),
                    });
                }
            }
        }

        if self
            .wishlist
            .find_by_user_and_target(&caller.id, &target)
            .await?
            .is_some()
        {
            warn!("Duplicate wishlist entry rejected");
            return Err(ServiceError::DuplicateWishlistEntry {
                user_id: caller.id.clone(),
                target_id: target.id().to_string(),
            });
        }

        let entry = WishlistItem::new(caller.id.clone(), target);
        let created = self.wishlist.create(entry).await?;

        info!("Wishlist entry created with ID: {}", created.id);
        Ok(created)
    }

    /// The caller's wishlist, each entry resolved against the catalog.
    /// Entries whose target has since been deleted are skipped.
    #[instrument(skip(self), fields(caller = %caller.username))]
    pub async fn list_entries(&self, caller: &AuthUser) -> ServiceResult<Vec<WishlistEntryView>> {
        let entries = self.wishlist.find_by_user(&caller.id).await?;

        let mut views = Vec::with_capacity(entries.len());
        for entry in entries {
            match &entry.target {
                RatingTarget::FoodItem { food_item_id } => {
                    if let Some(item) = self.food_items.find_by_id(food_item_id).await? {
                        views.push(WishlistEntryView {
                            id: entry.id,
                            added_at: entry.added_at,
                            entry_type: "food_item",
                            food_item: Some(item),
                            restaurant: None,
                        });
                    }
                }
                RatingTarget::Restaurant { restaurant_id } => {
                    if let Some(restaurant) = self.restaurants.find_by_id(restaurant_id).await? {
                        views.push(WishlistEntryView {
                            id: entry.id,
                            added_at: entry.added_at,
                            entry_type: "restaurant",
                            food_item: None,
                            restaurant: Some(restaurant),
                        });
                    }
                }
            }
        }
        Ok(views)
    }

    /// Remove a wishlist entry. Owner only.
    #[instrument(skip(self), fields(id = %id, caller = %caller.username))]
    pub async fn remove_entry(&self, id: &str, caller: &AuthUser) -> ServiceResult<()> {
        let entry = match self.wishlist.find_by_id(id).await? {
            Some(entry) => entry,
            None => {
                return Err(ServiceError::WishlistItemNotFound { id: id.to_string() });
            }
        };

        if entry.user_id != caller.id {
            return Err(ServiceError::Forbidden);
        }

        self.wishlist.delete(id).await?;
        info!("Wishlist entry removed");
        Ok(())
    }
}
