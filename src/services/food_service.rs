use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::models::{
    AuthUser, CreateFoodItemRequest, FoodItem, FoodItemFilters, FoodItemListResponse,
    ServiceError, ServiceResult, SortKey, UpdateFoodItemRequest, Validate,
};
use crate::query;
use crate::repositories::FoodItemRepository;

/// Service for managing the food item catalog
pub struct FoodItemService {
    repository: Arc<dyn FoodItemRepository>,
}

impl FoodItemService {
    pub fn new(repository: Arc<dyn FoodItemRepository>) -> Self {
        Self { repository }
    }

    /// List food items matching the filters, ordered by the sort key
    #[instrument(skip(self, filters), fields(sort_by = %sort_by))]
    pub async fn list_food_items(
        &self,
        filters: FoodItemFilters,
        sort_by: SortKey,
    ) -> ServiceResult<FoodItemListResponse> {
        let items = self.repository.find_all().await?;
        let matched = query::query(items, |item| item.matches_filters(&filters), sort_by);

        info!("Found {} food items matching criteria", matched.len());

        Ok(FoodItemListResponse {
            total_count: matched.len(),
            food_items: matched,
        })
    }

    /// Get a specific food item by ID
    #[instrument(skip(self), fields(id = %id))]
    pub async fn get_food_item(&self, id: &str) -> ServiceResult<FoodItem> {
        if id.is_empty() {
            return Err(ServiceError::ValidationError {
                message: "Food item ID cannot be empty".to_string(),
            });
        }

        match self.repository.find_by_id(id).await? {
            Some(item) => Ok(item),
            None => {
                warn!("Food item not found");
                Err(ServiceError::FoodItemNotFound { id: id.to_string() })
            }
        }
    }

    /// Create a new food item, owned by the caller
    #[instrument(skip(self, request), fields(name = %request.name, caller = %caller.username))]
    pub async fn create_food_item(
        &self,
        request: CreateFoodItemRequest,
        caller: &AuthUser,
    ) -> ServiceResult<FoodItem> {
        request.validate()?;

        let item = FoodItem::new(request, caller.id.clone());
        let created = self.repository.create(item).await?;

        info!("Food item created with ID: {}", created.id);
        Ok(created)
    }

    /// Update an existing food item. Allowed for the creator or an admin.
    #[instrument(skip(self, request), fields(id = %id, caller = %caller.username))]
    pub async fn update_food_item(
        &self,
        id: &str,
        request: UpdateFoodItemRequest,
        caller: &AuthUser,
    ) -> ServiceResult<FoodItem> {
        request.validate()?;

        let mut item = self.get_food_item(id).await?;

        if item.created_by != caller.id && !caller.is_admin() {
            warn!("Caller is neither creator nor admin");
            return Err(ServiceError::Forbidden);
        }

        item.update(request);
        let updated = self.repository.update(item).await?;

        info!("Food item updated");
        Ok(updated)
    }

    /// Delete a food item. Admin only.
    #[instrument(skip(self), fields(id = %id, caller = %caller.username))]
    pub async fn delete_food_item(&self, id: &str, caller: &AuthUser) -> ServiceResult<()> {
        if !caller.is_admin() {
            return Err(ServiceError::Forbidden);
        }

        // Resolve first so a missing id reports not-found rather than a bare
        // repository error
        self.get_food_item(id).await?;
        self.repository.delete(id).await?;

        info!("Food item deleted");
        Ok(())
    }
}
