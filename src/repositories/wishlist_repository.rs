use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::models::{RatingTarget, RepositoryError, RepositoryResult, WishlistItem};

/// Trait defining the interface for wishlist data access
#[async_trait]
pub trait WishlistRepository: Send + Sync {
    /// A user's entries in insertion order
    async fn find_by_user(&self, user_id: &str) -> RepositoryResult<Vec<WishlistItem>>;

    async fn find_by_id(&self, id: &str) -> RepositoryResult<Option<WishlistItem>>;

    /// The user's entry for the given target, if any. Backs the
    /// one-entry-per-(user, target) invariant.
    async fn find_by_user_and_target(
        &self,
        user_id: &str,
        target: &RatingTarget,
    ) -> RepositoryResult<Option<WishlistItem>>;

    async fn create(&self, item: WishlistItem) -> RepositoryResult<WishlistItem>;

    async fn delete(&self, id: &str) -> RepositoryResult<()>;
}

/// In-memory implementation backed by an insertion-ordered list
#[derive(Default)]
pub struct InMemoryWishlistRepository {
    items: RwLock<Vec<WishlistItem>>,
}

impl InMemoryWishlistRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl WishlistRepository for InMemoryWishlistRepository {
    async fn find_by_user(&self, user_id: &str) -> RepositoryResult<Vec<WishlistItem>> {
        Ok(self
            .items
            .read()
            .await
            .iter()
            .filter(|item| item.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: &str) -> RepositoryResult<Option<WishlistItem>> {
        Ok(self
            .items
            .read()
            .await
            .iter()
            .find(|item| item.id == id)
            .cloned())
    }

    async fn find_by_user_and_target(
        &self,
        user_id: &str,
        target: &RatingTarget,
    ) -> RepositoryResult<Option<WishlistItem>> {
        Ok(self
            .items
            .read()
            .await
            .iter()
            .find(|item| item.user_id == user_id && &item.target == target)
            .cloned())
    }

    async fn create(&self, item: WishlistItem) -> RepositoryResult<WishlistItem> {
        self.items.write().await.push(item.clone());
        Ok(item)
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
}

#[cfg(test)]
mod tests {
    use super::*;

    fn food_target(id: &str) -> RatingTarget {
        RatingTarget::FoodItem {
            food_item_id: id.to_string(),
        }
    }

    #[tokio::test]
    async fn test_entries_scoped_to_user() {
        let repo = InMemoryWishlistRepository::new();
        repo.create(WishlistItem::new("u1".to_string(), food_target("f1")))
            .await
            .unwrap();
        repo.create(WishlistItem::new("u1".to_string(), food_target("f2")))
            .await
            .unwrap();
        repo.create(WishlistItem::new("u2".to_string(), food_target("f1")))
            .await
            .unwrap();

        assert_eq!(repo.find_by_user("u1").await.unwrap().len(), 2);
        assert!(repo
            .find_by_user_and_target("u2", &food_target("f1"))
            .await
            .unwrap()
            .is_some());
        assert!(repo
            .find_by_user_and_target("u2", &food_target("f2"))
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_delete_missing_entry_errors() {
        let repo = InMemoryWishlistRepository::new();
        let item = WishlistItem::new("u1".to_string(), food_target("f1"));
        let id = item.id.clone();
        repo.create(item).await.unwrap();

        repo.delete(&id).await.unwrap();
        assert!(matches!(repo.delete(&id).await, Err(RepositoryError::NotFound)));
    }
}
