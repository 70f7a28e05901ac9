use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::models::{RepositoryError, RepositoryResult, Restaurant};

/// Trait defining the interface for restaurant data access
#[async_trait]
pub trait RestaurantRepository: Send + Sync {
    /// All restaurants in insertion order
    async fn find_all(&self) -> RepositoryResult<Vec<Restaurant>>;

    async fn find_by_id(&self, id: &str) -> RepositoryResult<Option<Restaurant>>;

    async fn create(&self, restaurant: Restaurant) -> RepositoryResult<Restaurant>;

    async fn update(&self, restaurant: Restaurant) -> RepositoryResult<Restaurant>;

    async fn delete(&self, id: &str) -> RepositoryResult<()>;

    async fn exists(&self, id: &str) -> RepositoryResult<bool>;
}

/// In-memory implementation backed by an insertion-ordered list
#[derive(Default)]
pub struct InMemoryRestaurantRepository {
    restaurants: RwLock<Vec<Restaurant>>,
}

impl InMemoryRestaurantRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RestaurantRepository for InMemoryRestaurantRepository {
    async fn find_all(&self) -> RepositoryResult<Vec<Restaurant>> {
        Ok(self.restaurants.read().await.clone())
    }

    async fn find_by_id(&self, id: &str) -> RepositoryResult<Option<Restaurant>> {
        Ok(self
            .restaurants
            .read()
            .await
            .iter()
            .find(|restaurant| restaurant.id == id)
            .cloned())
    }

    async fn create(&self, restaurant: Restaurant) -> RepositoryResult<Restaurant> {
        let mut restaurants = self.restaurants.write().await;
        if restaurants.iter().any(|existing| existing.id == restaurant.id) {
            return Err(RepositoryError::ConstraintViolation {
                message: format!("Duplicate restaurant id: {}", restaurant.id),
            });
        }
        restaurants.push(restaurant.clone());
        Ok(restaurant)
    }

    async fn update(&self, restaurant: Restaurant) -> RepositoryResult<Restaurant> {
        let mut restaurants = self.restaurants.write().await;
        match restaurants
            .iter_mut()
            .find(|existing| existing.id == restaurant.id)
        {
            Some(existing) => {
                *existing = restaurant.clone();
                Ok(restaurant)
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    async fn delete(&self, id: &str) -> RepositoryResult<()> {
        let mut restaurants = self.restaurants.write().await;
        let before = restaurants.len();
        restaurants.retain(|restaurant| restaurant.id != id);
        if restaurants.len() == before {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn exists(&self, id: &str) -> RepositoryResult<bool> {
        Ok(self
            .restaurants
            .read()
            .await
            .iter()
            .any(|restaurant| restaurant.id == id))
    }
}
