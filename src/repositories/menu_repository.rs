use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::models::{MenuItem, MenuSection, RepositoryError, RepositoryResult};

/// Menu join records: items placing food on a restaurant's menu, and the
/// sections grouping them.
#[async_trait]
pub trait MenuRepository: Send + Sync {
    async fn find_item_by_id(&self, id: &str) -> RepositoryResult<Option<MenuItem>>;

    async fn items_for_restaurant(&self, restaurant_id: &str) -> RepositoryResult<Vec<MenuItem>>;

    async fn create_item(&self, item: MenuItem) -> RepositoryResult<MenuItem>;

    async fn delete_item(&self, id: &str) -> RepositoryResult<()>;

    async fn sections_for_restaurant(
        &self,
        restaurant_id: &str,
    ) -> RepositoryResult<Vec<MenuSection>>;

    async fn create_section(&self, section: MenuSection) -> RepositoryResult<MenuSection>;

    /// Drop a menu item id from every section that references it
    async fn remove_item_from_sections(&self, menu_item_id: &str) -> RepositoryResult<()>;
}

/// In-memory implementation backed by insertion-ordered lists
#[derive(Default)]
pub struct InMemoryMenuRepository {
    items: RwLock<Vec<MenuItem>>,
    sections: RwLock<Vec<MenuSection>>,
}

impl InMemoryMenuRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MenuRepository for InMemoryMenuRepository {
    async fn find_item_by_id(&self, id: &str) -> RepositoryResult<Option<MenuItem>> {
        Ok(self
            .items
            .read()
            .await
            .iter()
            .find(|item| item.id == id)
            .cloned())
    }

    async fn items_for_restaurant(&self, restaurant_id: &str) -> RepositoryResult<Vec<MenuItem>> {
        Ok(self
            .items
            .read()
            .await
            .iter()
            .filter(|item| item.restaurant_id == restaurant_id)
            .cloned()
            .collect())
    }

    async fn create_item(&self, item: MenuItem) -> RepositoryResult<MenuItem> {
        self.items.write().await.push(item.clone());
        Ok(item)
    }

    async fn delete_item(&self, id: &str) -> RepositoryResult<()> {
        let mut items = self.items.write().await;
        let before = items.len();
        items.retain(|item| item.id != id);
        if items.len() == before {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn sections_for_restaurant(
        &self,
        restaurant_id: &str,
    ) -> RepositoryResult<Vec<MenuSection>> {
        Ok(self
            .sections
            .read()
            .await
            .iter()
            .filter(|section| section.restaurant_id == restaurant_id)
            .cloned()
            .collect())
    }

    async fn create_section(&self, section: MenuSection) -> RepositoryResult<MenuSection> {
        self.sections.write().await.push(section.clone());
        Ok(section)
    }

    async fn remove_item_from_sections(&self, menu_item_id: &str) -> RepositoryResult<()> {
        for section in self.sections.write().await.iter_mut() {
            section.items.retain(|id| id != menu_item_id);
        }
        Ok(())
    }
}
