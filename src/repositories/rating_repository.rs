use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::models::{Rating, RatingTarget, RepositoryError, RepositoryResult};

/// Trait defining the interface for rating data access
#[async_trait]
pub trait RatingRepository: Send + Sync {
    /// All ratings in insertion order
    async fn find_all(&self) -> RepositoryResult<Vec<Rating>>;

    async fn find_by_id(&self, id: &str) -> RepositoryResult<Option<Rating>>;

    async fn find_by_user(&self, user_id: &str) -> RepositoryResult<Vec<Rating>>;

    /// All ratings pointing at the given target
    async fn find_by_target(&self, target: &RatingTarget) -> RepositoryResult<Vec<Rating>>;

    /// The user's rating of the given target, if any. Backs the
    /// one-rating-per-(user, target) invariant.
    async fn find_by_user_and_target(
        &self,
        user_id: &str,
        target: &RatingTarget,
    ) -> RepositoryResult<Option<Rating>>;

    async fn create(&self, rating: Rating) -> RepositoryResult<Rating>;

    async fn update(&self, rating: Rating) -> RepositoryResult<Rating>;

    async fn delete(&self, id: &str) -> RepositoryResult<()>;
}

/// In-memory implementation backed by an insertion-ordered list
#[derive(Default)]
pub struct InMemoryRatingRepository {
    ratings: RwLock<Vec<Rating>>,
}

impl InMemoryRatingRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RatingRepository for InMemoryRatingRepository {
    async fn find_all(&self) -> RepositoryResult<Vec<Rating>> {
        Ok(self.ratings.read().await.clone())
    }

    async fn find_by_id(&self, id: &str) -> RepositoryResult<Option<Rating>> {
        Ok(self
            .ratings
            .read()
            .await
            .iter()
            .find(|rating| rating.id == id)
            .cloned())
    }

    async fn find_by_user(&self, user_id: &str) -> RepositoryResult<Vec<Rating>> {
        Ok(self
            .ratings
            .read()
            .await
            .iter()
            .filter(|rating| rating.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn find_by_target(&self, target: &RatingTarget) -> RepositoryResult<Vec<Rating>> {
        Ok(self
            .ratings
            .read()
            .await
            .iter()
            .filter(|rating| &rating.target == target)
            .cloned()
            .collect())
    }

    async fn find_by_user_and_target(
        &self,
        user_id: &str,
        target: &RatingTarget,
    ) -> RepositoryResult<Option<Rating>> {
        Ok(self
            .ratings
            .read()
            .await
            .iter()
            .find(|rating| rating.user_id == user_id && &rating.target == target)
            .cloned())
    }

    async fn create(&self, rating: Rating) -> RepositoryResult<Rating> {
        let mut ratings = self.ratings.write().await;
        if ratings.iter().any(|existing| existing.id == rating.id) {
            return Err(RepositoryError::ConstraintViolation {
                message: format!("Duplicate rating id: {}", rating.id),
            });
        }
        ratings.push(rating.clone());
        Ok(rating)
    }

    async fn update(&self, rating: Rating) -> RepositoryResult<Rating> {
        let mut ratings = self.ratings.write().await;
        match ratings.iter_mut().find(|existing| existing.id == rating.id) {
            Some(existing) => {
                *existing = rating.clone();
                Ok(rating)
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    async fn delete(&self, id: &str) -> RepositoryResult<()> {
        let mut ratings = self.ratings.write().await;
        let before = ratings.len();
        ratings.retain(|rating| rating.id != id);
        if ratings.len() == before {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
