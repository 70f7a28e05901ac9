use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::models::{RepositoryError, RepositoryResult, StoredUser, User};

/// Trait defining the interface for user account data access
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// All public profiles in insertion order
    async fn find_all(&self) -> RepositoryResult<Vec<User>>;

    async fn find_by_id(&self, id: &str) -> RepositoryResult<Option<StoredUser>>;

    /// Usernames are unique; this backs both login and registration checks
    async fn find_by_username(&self, username: &str) -> RepositoryResult<Option<StoredUser>>;

    async fn create(&self, user: StoredUser) -> RepositoryResult<StoredUser>;

    /// Replace the profile of the stored user with the same id, keeping the
    /// password digest
    async fn update_profile(&self, user: User) -> RepositoryResult<User>;
}

/// In-memory implementation backed by an insertion-ordered list
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<Vec<StoredUser>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_all(&self) -> RepositoryResult<Vec<User>> {
        Ok(self
            .users
            .read()
            .await
            .iter()
            .map(|stored| stored.user.clone())
            .collect())
    }

    async fn find_by_id(&self, id: &str) -> RepositoryResult<Option<StoredUser>> {
        Ok(self
            .users
            .read()
            .await
            .iter()
            .find(|stored| stored.user.id == id)
            .cloned())
    }

    async fn find_by_username(&self, username: &str) -> RepositoryResult<Option<StoredUser>> {
        Ok(self
            .users
            .read()
            .await
            .iter()
            .find(|stored| stored.user.username == username)
            .cloned())
    }

    async fn create(&self, user: StoredUser) -> RepositoryResult<StoredUser> {
        let mut users = self.users.write().await;
        if users
            .iter()
            .any(|existing| existing.user.username == user.user.username)
        {
            return Err(RepositoryError::ConstraintViolation {
                message: format!("Duplicate username: {}", user.user.username),
            });
        }
        users.push(user.clone());
        Ok(user)
    }

    async fn update_profile(&self, user: User) -> RepositoryResult<User> {
        let mut users = self.users.write().await;
        match users.iter_mut().find(|stored| stored.user.id == user.id) {
            Some(stored) => {
                stored.user = user.clone();
                Ok(user)
            }
            None => Err(RepositoryError::NotFound),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{UserPreferences, UserRole};

    fn stored(username: &str) -> StoredUser {
        StoredUser {
            user: User::new(
                format!("{}@example.com", username),
                username.to_string(),
                None,
                None,
                UserRole::User,
                UserPreferences::default(),
            ),
            password_digest: "digest".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_and_lookup() {
        let repo = InMemoryUserRepository::new();
        let user = stored("alice");
        let id = user.user.id.clone();
        repo.create(user).await.unwrap();

        assert!(repo.find_by_username("alice").await.unwrap().is_some());
        assert!(repo.find_by_username("bob").await.unwrap().is_none());
        assert_eq!(repo.find_by_id(&id).await.unwrap().unwrap().user.username, "alice");
    }

    #[tokio::test]
    async fn test_duplicate_username_rejected() {
        let repo = InMemoryUserRepository::new();
        repo.create(stored("alice")).await.unwrap();

        assert!(matches!(
            repo.create(stored("alice")).await,
            Err(RepositoryError::ConstraintViolation { .. })
        ));
    }

    #[tokio::test]
    async fn test_update_profile_keeps_digest() {
        let repo = InMemoryUserRepository::new();
        let user = stored("alice");
        let id = user.user.id.clone();
        repo.create(user).await.unwrap();

        let mut profile = repo.find_by_id(&id).await.unwrap().unwrap().user;
        profile.full_name = Some("Alice Example".to_string());
        repo.update_profile(profile).await.unwrap();

        let stored = repo.find_by_id(&id).await.unwrap().unwrap();
        assert_eq!(stored.user.full_name.as_deref(), Some("Alice Example"));
        assert_eq!(stored.password_digest, "digest");
    }
}
