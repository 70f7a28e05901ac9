use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::models::{
    AuthUser, CreateMenuItemRequest, CreateMenuSectionRequest, CreateRestaurantRequest,
    MenuEntryView, MenuItem, MenuSection, MenuSectionView, Restaurant, RestaurantFilters,
    ServiceError, ServiceResult, SortKey, UpdateRestaurantRequest, Validate,
};
use crate::query;
use crate::repositories::{FoodItemRepository, MenuRepository, RestaurantRepository};

/// Service for managing restaurants and their menus
pub struct RestaurantService {
    repository: Arc<dyn RestaurantRepository>,
    menu_repository: Arc<dyn MenuRepository>,
    food_repository: Arc<dyn FoodItemRepository>,
}

impl RestaurantService {
    pub fn new(
        repository: Arc<dyn RestaurantRepository>,
        menu_repository: Arc<dyn MenuRepository>,
        food_repository: Arc<dyn FoodItemRepository>,
    ) -> Self {
        Self {
            repository,
            menu_repository,
            food_repository,
        }
    }

    /// List restaurants matching the filters, ordered by the sort key
    #[instrument(skip(self, filters), fields(sort_by = %sort_by))]
    pub async fn list_restaurants(
        &self,
        filters: RestaurantFilters,
        sort_by: SortKey,
    ) -> ServiceResult<Vec<Restaurant>> {
        let restaurants = self.repository.find_all().await?;
        let matched = query::query(
            restaurants,
            |restaurant| restaurant.matches_filters(&filters),
            sort_by,
        );

        info!("Found {} restaurants matching criteria", matched.len());
        Ok(matched)
    }

    /// Get a specific restaurant by ID
    #[instrument(skip(self), fields(id = %id))]
    pub async fn get_restaurant(&self, id: &str) -> ServiceResult<Restaurant> {
        if id.is_empty() {
            return Err(ServiceError::ValidationError {
                message: "Restaurant ID cannot be empty".to_string(),
            });
        }

        match self.repository.find_by_id(id).await? {
            Some(restaurant) => Ok(restaurant),
            None => {
                warn!("Restaurant not found");
                Err(ServiceError::RestaurantNotFound { id: id.to_string() })
            }
        }
    }

    /// Create a restaurant. Admin only.
    #[instrument(skip(self, request), fields(name = %request.name, caller = %caller.username))]
    pub async fn create_restaurant(
        &self,
        request: CreateRestaurantRequest,
        caller: &AuthUser,
    ) -> ServiceResult<Restaurant> {
        if !caller.is_admin() {
            return Err(ServiceError::Forbidden);
        }
        request.validate()?;

        let restaurant = Restaurant::new(request, caller.id.clone());
        let created = self.repository.create(restaurant).await?;

        info!("Restaurant created with ID: {}", created.id);
        Ok(created)
    }

    /// Update a restaurant. Admin only.
    #[instrument(skip(self, request), fields(id = %id, caller = %caller.username))]
    pub async fn update_restaurant(
        &self,
        id: &str,
        request: UpdateRestaurantRequest,
        caller: &AuthUser,
    ) -> ServiceResult<Restaurant> {
        if !caller.is_admin() {
            return Err(ServiceError::Forbidden);
        }

        let mut restaurant = self.get_restaurant(id).await?;
        restaurant.update(request);
        let updated = self.repository.update(restaurant).await?;

        info!("Restaurant updated");
        Ok(updated)
    }

    /// Delete a restaurant. Admin only.
    #[instrument(skip(self), fields(id = %id, caller = %caller.username))]
    pub async fn delete_restaurant(&self, id: &str, caller: &AuthUser) -> ServiceResult<()> {
        if !caller.is_admin() {
            return Err(ServiceError::Forbidden);
        }

        self.get_restaurant(id).await?;
        self.repository.delete(id).await?;

        info!("Restaurant deleted");
        Ok(())
    }

    /// Assemble the restaurant's menu: sections in insertion order, each
    /// with its items resolved against the food catalog. Items whose food
    /// record has been deleted are skipped.
    #[instrument(skip(self), fields(restaurant_id = %restaurant_id))]
    pub async fn get_menu(&self, restaurant_id: &str) -> ServiceResult<Vec<MenuSectionView>> {
        self.get_restaurant(restaurant_id).await?;

        let sections = self
            .menu_repository
            .sections_for_restaurant(restaurant_id)
            .await?;

        let mut menu = Vec::with_capacity(sections.len());
        for section in sections {
            let mut items = Vec::with_capacity(section.items.len());
            for menu_item_id in &section.items {
                let Some(menu_item) = self.menu_repository.find_item_by_id(menu_item_id).await?
                else {
                    continue;
                };
                let Some(food_item) =
                    self.food_repository.find_by_id(&menu_item.food_item_id).await?
                else {
                    continue;
                };

                items.push(MenuEntryView {
                    id: menu_item.id,
                    food_item_id: food_item.id,
                    name: food_item.name,
                    description: food_item.description,
                    price: menu_item.price,
                    available: menu_item.available,
                    special: menu_item.special,
                    discount_percentage: menu_item.discount_percentage,
                    category: food_item.category,
                    image_url: food_item.image_url,
                    average_rating: food_item.average_rating,
                    rating_count: food_item.rating_count,
                });
            }

            menu.push(MenuSectionView {
                id: section.id,
                name: section.name,
                description: section.description,
                items,
            });
        }

        Ok(menu)
    }

    /// Put a food item on the restaurant's menu. Admin only. Stamps the
    /// restaurant id and menu price onto the food item.
    #[instrument(skip(self, request), fields(restaurant_id = %restaurant_id, caller = %caller.username))]
    pub async fn add_menu_item(
        &self,
        restaurant_id: &str,
        request: CreateMenuItemRequest,
        caller: &AuthUser,
    ) -> ServiceResult<MenuItem> {
        if !caller.is_admin() {
            return Err(ServiceError::Forbidden);
        }

        self.get_restaurant(restaurant_id).await?;

        let mut food_item = match self.food_repository.find_by_id(&request.food_item_id).await? {
            Some(item) => item,
            None => {
                return Err(ServiceError::FoodItemNotFound {
                    id: request.food_item_id.clone(),
                })
            }
        };

        let menu_item = MenuItem::new(restaurant_id.to_string(), request);
        let created = self.menu_repository.create_item(menu_item).await?;

        food_item.restaurant_id = Some(restaurant_id.to_string());
        food_item.price = Some(created.price);
        self.food_repository.update(food_item).await?;

        info!("Menu item created with ID: {}", created.id);
        Ok(created)
    }

    /// Add a named menu section. Admin only. Every referenced menu item must
    /// exist and belong to this restaurant.
    #[instrument(skip(self, request), fields(restaurant_id = %restaurant_id, caller = %caller.username))]
    pub async fn add_menu_section(
        &self,
        restaurant_id: &str,
        request: CreateMenuSectionRequest,
        caller: &AuthUser,
    ) -> ServiceResult<MenuSection> {
        if !caller.is_admin() {
            return Err(ServiceError::Forbidden);
        }

        self.get_restaurant(restaurant_id).await?;

        for menu_item_id in &request.items {
            match self.menu_repository.find_item_by_id(menu_item_id).await? {
                Some(item) if item.restaurant_id == restaurant_id => {}
                Some(_) => {
                    return Err(ServiceError::ValidationError {
                        message: format!(
                            "Menu item {} does not belong to this restaurant",
                            menu_item_id
                        ),
                    })
                }
                None => {
                    return Err(ServiceError::MenuItemNotFound {
                        id: menu_item_id.clone(),
                    })
                }
            }
        }

        let section = MenuSection::new(restaurant_id.to_string(), request);
        let created = self.menu_repository.create_section(section).await?;

        info!("Menu section created with ID: {}", created.id);
        Ok(created)
    }

    /// Remove a menu item and drop it from every section. Admin only.
    #[instrument(skip(self), fields(menu_item_id = %menu_item_id, caller = %caller.username))]
    pub async fn delete_menu_item(
        &self,
        menu_item_id: &str,
        caller: &AuthUser,
    ) -> ServiceResult<()> {
        if !caller.is_admin() {
            return Err(ServiceError::Forbidden);
        }

        if self
            .menu_repository
            .find_item_by_id(menu_item_id)
            .await?
            .is_none()
        {
            return Err(ServiceError::MenuItemNotFound {
                id: menu_item_id.to_string(),
            });
        }

        self.menu_repository
            .remove_item_from_sections(menu_item_id)
            .await?;
        self.menu_repository.delete_item(menu_item_id).await?;

        info!("Menu item deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Cuisine, PriceRange, UserRole};
    use crate::repositories::{
        InMemoryFoodItemRepository, InMemoryMenuRepository, InMemoryRestaurantRepository,
    };
    use rust_decimal_macros::dec;
    use std::collections::HashMap;

    fn admin() -> AuthUser {
        AuthUser {
            id: "admin-1".to_string(),
            username: "admin".to_string(),
            role: UserRole::Admin,
        }
    }

    fn regular_user() -> AuthUser {
        AuthUser {
            id: "u1".to_string(),
            username: "bob".to_string(),
            role: UserRole::User,
        }
    }

    fn service() -> RestaurantService {
        RestaurantService::new(
            Arc::new(InMemoryRestaurantRepository::new()),
            Arc::new(InMemoryMenuRepository::new()),
            Arc::new(InMemoryFoodItemRepository::new()),
        )
    }

    fn restaurant_request(name: &str) -> CreateRestaurantRequest {
        CreateRestaurantRequest {
            name: name.to_string(),
            description: "Neighborhood kitchen".to_string(),
            cuisine_types: vec![Cuisine::Italian],
            address: "1 Main St".to_string(),
            city: "Portland".to_string(),
            state: None,
            country: "USA".to_string(),
            postal_code: "97201".to_string(),
            phone: "+1-503-555-0100".to_string(),
            email: None,
            website: None,
            price_range: PriceRange::Moderate,
            opening_hours: HashMap::new(),
            image_url: None,
            social_media: None,
            features: None,
        }
    }

    fn food_request(name: &str) -> crate::models::CreateFoodItemRequest {
        crate::models::CreateFoodItemRequest {
            name: name.to_string(),
            description: "test dish".to_string(),
            cuisine: Cuisine::Italian,
            category: crate::models::ItemCategory::Food,
            drink_type: None,
            dietary_preferences: vec![crate::models::DietaryPreference::None],
            meal_types: vec![crate::models::MealType::Dinner],
            nutrition: None,
            ingredients: vec!["flour".to_string()],
            preparation_time_minutes: None,
            image_url: None,
        }
    }

    #[tokio::test]
    async fn test_mutations_are_admin_only() {
        let service = service();

        assert!(matches!(
            service
                .create_restaurant(restaurant_request("Roma"), &regular_user())
                .await,
            Err(ServiceError::Forbidden)
        ));

        let created = service
            .create_restaurant(restaurant_request("Roma"), &admin())
            .await
            .unwrap();

        assert!(matches!(
            service.delete_restaurant(&created.id, &regular_user()).await,
            Err(ServiceError::Forbidden)
        ));
        assert!(service.delete_restaurant(&created.id, &admin()).await.is_ok());
    }

    #[tokio::test]
    async fn test_menu_item_stamps_food_item() {
        let food_repo = Arc::new(InMemoryFoodItemRepository::new());
        let service = RestaurantService::new(
            Arc::new(InMemoryRestaurantRepository::new()),
            Arc::new(InMemoryMenuRepository::new()),
            food_repo.clone(),
        );

        let restaurant = service
            .create_restaurant(restaurant_request("Roma"), &admin())
            .await
            .unwrap();
        let food = crate::models::FoodItem::new(food_request("Carbonara"), "u1".to_string());
        let food_id = food.id.clone();
        food_repo.create(food).await.unwrap();

        service
            .add_menu_item(
                &restaurant.id,
                CreateMenuItemRequest {
                    food_item_id: food_id.clone(),
                    price: dec!(14.50),
                    available: true,
                    special: false,
                    discount_percentage: None,
                },
                &admin(),
            )
            .await
            .unwrap();

        let stamped = food_repo.find_by_id(&food_id).await.unwrap().unwrap();
        assert_eq!(stamped.restaurant_id, Some(restaurant.id));
        assert_eq!(stamped.price, Some(dec!(14.50)));
    }

    #[tokio::test]
    async fn test_menu_assembly_resolves_sections() {
        let food_repo = Arc::new(InMemoryFoodItemRepository::new());
        let service = RestaurantService::new(
            Arc::new(InMemoryRestaurantRepository::new()),
            Arc::new(InMemoryMenuRepository::new()),
            food_repo.clone(),
        );

        let restaurant = service
            .create_restaurant(restaurant_request("Roma"), &admin())
            .await
            .unwrap();
        let food = crate::models::FoodItem::new(food_request("Carbonara"), "u1".to_string());
        let food_id = food.id.clone();
        food_repo.create(food).await.unwrap();

        let menu_item = service
            .add_menu_item(
                &restaurant.id,
                CreateMenuItemRequest {
                    food_item_id: food_id,
                    price: dec!(14.50),
                    available: true,
                    special: true,
                    discount_percentage: None,
                },
                &admin(),
            )
            .await
            .unwrap();

        service
            .add_menu_section(
                &restaurant.id,
                CreateMenuSectionRequest {
                    name: "Mains".to_string(),
                    description: None,
                    items: vec![menu_item.id.clone()],
                },
                &admin(),
            )
            .await
            .unwrap();

        let menu = service.get_menu(&restaurant.id).await.unwrap();
        assert_eq!(menu.len(), 1);
        assert_eq!(menu[0].name, "Mains");
        assert_eq!(menu[0].items.len(), 1);
        assert_eq!(menu[0].items[0].name, "Carbonara");
        assert!(menu[0].items[0].special);
    }

    #[tokio::test]
    async fn test_section_rejects_foreign_menu_items() {
        let food_repo = Arc::new(InMemoryFoodItemRepository::new());
        let service = RestaurantService::new(
            Arc::new(InMemoryRestaurantRepository::new()),
            Arc::new(InMemoryMenuRepository::new()),
            food_repo.clone(),
        );

        let roma = service
            .create_restaurant(restaurant_request("Roma"), &admin())
            .await
            .unwrap();
        let napoli = service
            .create_restaurant(restaurant_request("Napoli"), &admin())
            .await
            .unwrap();

        let food = crate::models::FoodItem::new(food_request("Margherita"), "u1".to_string());
        let food_id = food.id.clone();
        food_repo.create(food).await.unwrap();

        let roma_item = service
            .add_menu_item(
                &roma.id,
                CreateMenuItemRequest {
                    food_item_id: food_id,
                    price: dec!(11.00),
                    available: true,
                    special: false,
                    discount_percentage: None,
                },
                &admin(),
            )
            .await
            .unwrap();

        let result = service
            .add_menu_section(
                &napoli.id,
                CreateMenuSectionRequest {
                    name: "Pizze".to_string(),
                    description: None,
                    items: vec![roma_item.id],
                },
                &admin(),
            )
            .await;
        assert!(matches!(result, Err(ServiceError::ValidationError { .. })));
    }

    #[tokio::test]
    async fn test_delete_menu_item_sweeps_sections() {
        let food_repo = Arc::new(InMemoryFoodItemRepository::new());
        let menu_repo = Arc::new(InMemoryMenuRepository::new());
        let service = RestaurantService::new(
            Arc::new(InMemoryRestaurantRepository::new()),
            menu_repo.clone(),
            food_repo.clone(),
        );

        let restaurant = service
            .create_restaurant(restaurant_request("Roma"), &admin())
            .await
            .unwrap();
        let food = crate::models::FoodItem::new(food_request("Tiramisu"), "u1".to_string());
        let food_id = food.id.clone();
        food_repo.create(food).await.unwrap();

        let menu_item = service
            .add_menu_item(
                &restaurant.id,
                CreateMenuItemRequest {
                    food_item_id: food_id,
                    price: dec!(6.00),
                    available: true,
                    special: false,
                    discount_percentage: None,
                },
                &admin(),
            )
            .await
            .unwrap();
        service
            .add_menu_section(
                &restaurant.id,
                CreateMenuSectionRequest {
                    name: "Desserts".to_string(),
                    description: None,
                    items: vec![menu_item.id.clone()],
                },
                &admin(),
            )
            .await
            .unwrap();

        service.delete_menu_item(&menu_item.id, &admin()).await.unwrap();

        let menu = service.get_menu(&restaurant.id).await.unwrap();
        assert!(menu[0].items.is_empty());
        assert!(matches!(
            service.delete_menu_item(&menu_item.id, &admin()).await,
            Err(ServiceError::MenuItemNotFound { .. })
        ));
    }
}
