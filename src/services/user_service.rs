use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::models::{
    validate_email, AuthUser, LoginRequest, RegisterRequest, ServiceError, ServiceResult,
    StoredUser, TokenResponse, UpdateUserRequest, User, UserPreferences, UserRole, Validate,
};
use crate::repositories::UserRepository;

/// A live bearer token and the identity it resolves to
#[derive(Debug, Clone)]
struct Session {
    user_id: String,
    username: String,
    role: UserRole,
    expires_at: DateTime<Utc>,
}

/// Service for accounts, login and bearer-token sessions. Tokens are opaque
/// ids into an in-memory session table with a TTL; they die with the
/// process like everything else here.
pub struct UserService {
    repository: Arc<dyn UserRepository>,
    sessions: RwLock<HashMap<String, Session>>,
    token_ttl: Duration,
}

impl UserService {
    pub fn new(repository: Arc<dyn UserRepository>, token_ttl: Duration) -> Self {
        Self {
            repository,
            sessions: RwLock::new(HashMap::new()),
            token_ttl,
        }
    }

    /// Register a new account with the given role
    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn register(&self, request: RegisterRequest, role: UserRole) -> ServiceResult<User> {
        request.validate()?;

        if self
            .repository
            .find_by_username(&request.username)
            .await?
            .is_some()
        {
            warn!("Username already taken");
            return Err(ServiceError::UsernameTaken {
                username: request.username,
            });
        }

        let user = User::new(
            request.email,
            request.username,
            request.full_name,
            request.profile_picture,
            role,
            request.preferences.unwrap_or_else(UserPreferences::default),
        );
        let password_digest = hash_password(&request.password);

        let created = self
            .repository
            .create(StoredUser {
                user,
                password_digest,
            })
            .await?;

        info!("User registered with ID: {}", created.user.id);
        Ok(created.user)
    }

    /// Exchange credentials for a bearer token
    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn login(&self, request: LoginRequest) -> ServiceResult<TokenResponse> {
        let stored = match self.repository.find_by_username(&request.username).await? {
            Some(stored) => stored,
            None => {
                warn!("Unknown username");
                return Err(ServiceError::InvalidCredentials);
            }
        };

        if !verify_password(&request.password, &stored.password_digest) {
            warn!("Password mismatch");
            return Err(ServiceError::InvalidCredentials);
        }

        let token = Uuid::new_v4().to_string();
        let session = Session {
            user_id: stored.user.id.clone(),
            username: stored.user.username.clone(),
            role: stored.user.role,
            expires_at: Utc::now() + self.token_ttl,
        };
        self.sessions.write().await.insert(token.clone(), session);

        info!("Login succeeded");
        Ok(TokenResponse {
            access_token: token,
            token_type: "bearer".to_string(),
            user: stored.user,
        })
    }

    /// Resolve a bearer token to the calling identity. Expired sessions are
    /// dropped on sight.
    pub async fn authenticate(&self, token: &str) -> ServiceResult<AuthUser> {
        let session = match self.sessions.read().await.get(token) {
            Some(session) => session.clone(),
            None => return Err(ServiceError::Unauthenticated),
        };

        if session.expires_at <= Utc::now() {
            self.sessions.write().await.remove(token);
            return Err(ServiceError::Unauthenticated);
        }

        Ok(AuthUser {
            id: session.user_id,
            username: session.username,
            role: session.role,
        })
    }

    /// The caller's own profile
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn get_profile(&self, user_id: &str) -> ServiceResult<User> {
        match self.repository.find_by_id(user_id).await? {
            Some(stored) => Ok(stored.user),
            None => Err(ServiceError::UserNotFound {
                username: user_id.to_string(),
            }),
        }
    }

    /// Partial update of the caller's profile and preferences
    #[instrument(skip(self, request), fields(user_id = %user_id))]
    pub async fn update_profile(
        &self,
        user_id: &str,
        request: UpdateUserRequest,
    ) -> ServiceResult<User> {
        if let Some(email) = &request.email {
            validate_email(email)?;
        }

        let mut user = self.get_profile(user_id).await?;
        user.update(request);
        let updated = self.repository.update_profile(user).await?;

        info!("Profile updated");
        Ok(updated)
    }

    /// All user profiles. Admin gating happens at the handler.
    #[instrument(skip(self))]
    pub async fn list_users(&self) -> ServiceResult<Vec<User>> {
        Ok(self.repository.find_all().await?)
    }
}

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

fn digest(password: &str, salt: &str) -> String {
    let mut hash = FNV_OFFSET;
    for byte in salt.bytes().chain(password.bytes()) {
        hash ^= u64::from(byte);
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    format!("{}${:016x}", salt, hash)
}

/// Salted FNV-1a digest. Not a password KDF; credential hardening is out of
/// scope for this service and the digest never leaves process memory.
fn hash_password(password: &str) -> String {
    digest(password, &Uuid::new_v4().to_string())
}

fn verify_password(password: &str, stored: &str) -> bool {
    match stored.split_once('$') {
        Some((salt, _)) => digest(password, salt) == stored,
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::InMemoryUserRepository;

    fn register_request(username: &str) -> RegisterRequest {
        RegisterRequest {
            email: format!("{}@example.com", username),
            username: username.to_string(),
            full_name: None,
            password: "correct horse".to_string(),
            profile_picture: None,
            preferences: None,
        }
    }

    fn service() -> UserService {
        UserService::new(Arc::new(InMemoryUserRepository::new()), Duration::minutes(30))
    }

    #[tokio::test]
    async fn test_register_login_authenticate_round_trip() {
        let service = service();
        let user = service
            .register(register_request("alice"), UserRole::User)
            .await
            .unwrap();
        assert_eq!(user.role, UserRole::User);

        let token = service
            .login(LoginRequest {
                username: "alice".to_string(),
                password: "correct horse".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(token.token_type, "bearer");

        let auth = service.authenticate(&token.access_token).await.unwrap();
        assert_eq!(auth.username, "alice");
        assert!(!auth.is_admin());
    }

    #[tokio::test]
    async fn test_wrong_password_rejected() {
        let service = service();
        service
            .register(register_request("alice"), UserRole::User)
            .await
            .unwrap();

        assert!(matches!(
            service
                .login(LoginRequest {
                    username: "alice".to_string(),
                    password: "battery staple".to_string(),
                })
                .await,
            Err(ServiceError::InvalidCredentials)
        ));
        assert!(matches!(
            service
                .login(LoginRequest {
                    username: "nobody".to_string(),
                    password: "correct horse".to_string(),
                })
                .await,
            Err(ServiceError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn test_duplicate_username_rejected() {
        let service = service();
        service
            .register(register_request("alice"), UserRole::User)
            .await
            .unwrap();

        assert!(matches!(
            service.register(register_request("alice"), UserRole::User).await,
            Err(ServiceError::UsernameTaken { .. })
        ));
    }

    #[tokio::test]
    async fn test_short_password_rejected() {
        let service = service();
        let mut request = register_request("alice");
        request.password = "short".to_string();

        assert!(matches!(
            service.register(request, UserRole::User).await,
            Err(ServiceError::ValidationError { .. })
        ));
    }

    #[tokio::test]
    async fn test_expired_token_rejected() {
        let service = UserService::new(
            Arc::new(InMemoryUserRepository::new()),
            Duration::minutes(-1),
        );
        service
            .register(register_request("alice"), UserRole::User)
            .await
            .unwrap();

        let token = service
            .login(LoginRequest {
                username: "alice".to_string(),
                password: "correct horse".to_string(),
            })
            .await
            .unwrap();

        assert!(matches!(
            service.authenticate(&token.access_token).await,
            Err(ServiceError::Unauthenticated)
        ));
    }

    #[tokio::test]
    async fn test_unknown_token_rejected() {
        let service = service();
        assert!(matches!(
            service.authenticate("no-such-token").await,
            Err(ServiceError::Unauthenticated)
        ));
    }

    #[tokio::test]
    async fn test_update_profile_validates_email() {
        let service = service();
        let user = service
            .register(register_request("alice"), UserRole::User)
            .await
            .unwrap();

        assert!(matches!(
            service
                .update_profile(
                    &user.id,
                    UpdateUserRequest {
                        email: Some("not-an-email".to_string()),
                        ..Default::default()
                    }
                )
                .await,
            Err(ServiceError::ValidationError { .. })
        ));

        let updated = service
            .update_profile(
                &user.id,
                UpdateUserRequest {
                    full_name: Some("Alice Example".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.full_name.as_deref(), Some("Alice Example"));
    }

    #[test]
    fn test_password_digest_round_trip() {
        let stored = hash_password("correct horse");
        assert!(verify_password("correct horse", &stored));
        assert!(!verify_password("battery staple", &stored));
        // Two digests of the same password differ by salt
        assert_ne!(stored, hash_password("correct horse"));
    }
}
