use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::models::{FoodItem, RepositoryError, RepositoryResult};

/// Trait defining the interface for food item data access
#[async_trait]
pub trait FoodItemRepository: Send + Sync {
    /// All items in insertion order
    async fn find_all(&self) -> RepositoryResult<Vec<FoodItem>>;

    async fn find_by_id(&self, id: &str) -> RepositoryResult<Option<FoodItem>>;

    async fn create(&self, item: FoodItem) -> RepositoryResult<FoodItem>;

    /// Replace the stored item with the same id
    async fn update(&self, item: FoodItem) -> RepositoryResult<FoodItem>;

    async fn delete(&self, id: &str) -> RepositoryResult<()>;

    async fn exists(&self, id: &str) -> RepositoryResult<bool>;

    async fn count(&self) -> RepositoryResult<usize>;
}

/// In-memory implementation backed by an insertion-ordered list
#[derive(Default)]
pub struct InMemoryFoodItemRepository {
    items: RwLock<Vec<FoodItem>>,
}

impl InMemoryFoodItemRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FoodItemRepository for InMemoryFoodItemRepository {
    async fn find_all(&self) -> RepositoryResult<Vec<FoodItem>> {
        Ok(self.items.read().await.clone())
    }

    async fn find_by_id(&self, id: &str) -> RepositoryResult<Option<FoodItem>> {
        Ok(self
            .items
            .read()
            .await
            .iter()
            .find(|item| item.id == id)
            .cloned())
    }

    async fn create(&self, item: FoodItem) -> RepositoryResult<FoodItem> {
        let mut items = self.items.write().await;
        if items.iter().any(|existing| existing.id == item.id) {
            return Err(RepositoryError::ConstraintViolation {
                message: format!("Duplicate food item id: {}", item.id),
            });
        }
        items.push(item.clone());
        Ok(item)
    }

    async fn update(&self, item: FoodItem) -> RepositoryResult<FoodItem> {
        let mut items = self.items.write().await;
        match items.iter_mut().find(|existing| existing.id == item.id) {
            Some(existing) => {
                *existing = item.clone();
                Ok(item)
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    async fn delete(&self, id: &str) -> RepositoryResult<()> {
        let mut items = self.items.write().await;
        let before = items.len();
        items.retain(|item| item.id != id);
        if items.len() == before {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn exists(&self, id: &str) -> RepositoryResult<bool> {
        Ok(self.items.read().await.iter().any(|item| item.id == id))
    }

    async fn count(&self) -> RepositoryResult<usize> {
        Ok(self.items.read().await.len())
    }
}
