use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::models::{RepositoryError, RepositoryResult, StoredFile};

/// Trait defining the interface for uploaded-file metadata access
#[async_trait]
pub trait FileRepository: Send + Sync {
    /// All file records in insertion order
    async fn find_all(&self) -> RepositoryResult<Vec<StoredFile>>;

    async fn find_by_id(&self, id: &str) -> RepositoryResult<Option<StoredFile>>;

    async fn find_by_uploader(&self, user_id: &str) -> RepositoryResult<Vec<StoredFile>>;

    async fn create(&self, file: StoredFile) -> RepositoryResult<StoredFile>;

    async fn delete(&self, id: &str) -> RepositoryResult<()>;
}

/// In-memory implementation backed by an insertion-ordered list
#[derive(Default)]
pub struct InMemoryFileRepository {
    files: RwLock<Vec<StoredFile>>,
}

impl InMemoryFileRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FileRepository for InMemoryFileRepository {
    async fn find_all(&self) -> RepositoryResult<Vec<StoredFile>> {
        Ok(self.files.read().await.clone())
    }

    async fn find_by_id(&self, id: &str) -> RepositoryResult<Option<StoredFile>> {
        Ok(self
            .files
            .read()
            .await
            .iter()
            .find(|file| file.id == id)
            .cloned())
    }

    async fn find_by_uploader(&self, user_id: &str) -> RepositoryResult<Vec<StoredFile>> {
        Ok(self
            .files
            .read()
            .await
            .iter()
            .filter(|file| file.uploaded_by == user_id)
            .cloned()
            .collect())
    }

    async fn create(&self, file: StoredFile) -> RepositoryResult<StoredFile> {
        self.files.write().await.push(file.clone());
        Ok(file)
    }

    async fn delete(&self, id: &str) -> RepositoryResult<()> {
        let mut files = self.files.write().await;
        let before = files.len();
        files.retain(|file| file.id != id);
        if files.len() == before {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FileCategory;
    use chrono::Utc;
    use uuid::Uuid;

    fn file(uploaded_by: &str) -> StoredFile {
        StoredFile {
            id: Uuid::new_v4().to_string(),
            filename: "photo.jpg".to_string(),
            content_type: "image/jpeg".to_string(),
            size: 1024,
            path: "uploads/food_images/photo.jpg".to_string(),
            url: "/files/food_images/photo.jpg".to_string(),
            uploaded_by: uploaded_by.to_string(),
            uploaded_at: Utc::now(),
            category: FileCategory::FoodImages,
            related_id: None,
            description: None,
        }
    }

    #[tokio::test]
    async fn test_uploader_scoping() {
        let repo = InMemoryFileRepository::new();
        repo.create(file("u1")).await.unwrap();
        repo.create(file("u1")).await.unwrap();
        repo.create(file("u2")).await.unwrap();

        assert_eq!(repo.find_by_uploader("u1").await.unwrap().len(), 2);
        assert_eq!(repo.find_all().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_delete() {
        let repo = InMemoryFileRepository::new();
        let record = file("u1");
        let id = record.id.clone();
        repo.create(record).await.unwrap();

        repo.delete(&id).await.unwrap();
        assert!(repo.find_by_id(&id).await.unwrap().is_none());
        assert!(matches!(repo.delete(&id).await, Err(RepositoryError::NotFound)));
    }
}
