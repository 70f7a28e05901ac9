use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Cuisine, DietaryPreference, Language, PriceRange, UserRole};

/// Per-user application preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPreferences {
    pub language: Language,
    pub dark_mode: bool,
    pub dietary_preferences: Vec<DietaryPreference>,
    pub favorite_cuisines: Vec<Cuisine>,
    pub price_range_preference: Option<Vec<PriceRange>>,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            language: Language::English,
            dark_mode: false,
            dietary_preferences: Vec::new(),
            favorite_cuisines: Vec::new(),
            price_range_preference: None,
        }
    }
}

/// Public user profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub username: String,
    pub full_name: Option<String>,
    pub profile_picture: Option<String>,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub preferences: UserPreferences,
}

/// User record as held by the repository; never serialized to clients
#[derive(Debug, Clone)]
pub struct StoredUser {
    pub user: User,
    pub password_digest: String,
}

/// Registration / admin-creation request
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub username: String,
    pub full_name: Option<String>,
    pub password: String,
    pub profile_picture: Option<String>,
    pub preferences: Option<UserPreferences>,
}

/// Partial update of the caller's own profile
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUserRequest {
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub profile_picture: Option<String>,
    pub preferences: Option<UpdatePreferencesRequest>,
}

/// Field-wise preference update
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePreferencesRequest {
    pub language: Option<Language>,
    pub dark_mode: Option<bool>,
    pub dietary_preferences: Option<Vec<DietaryPreference>>,
    pub favorite_cuisines: Option<Vec<Cuisine>>,
    pub price_range_preference: Option<Vec<PriceRange>>,
}

/// Form body for `POST /token`
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Successful login payload
#[derive(Debug, Clone, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub user: User,
}

/// The authenticated caller, as decoded from a bearer token
#[derive(Debug, Clone, PartialEq)]
pub struct AuthUser {
    pub id: String,
    pub username: String,
    pub role: UserRole,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

impl User {
    pub fn new(
        email: String,
        username: String,
        full_name: Option<String>,
        profile_picture: Option<String>,
        role: UserRole,
        preferences: UserPreferences,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            email,
            username,
            full_name,
            profile_picture,
            role,
            created_at: Utc::now(),
            preferences,
        }
    }

    /// Apply the provided fields of a profile update
    pub fn update(&mut self, request: UpdateUserRequest) {
        if let Some(email) = request.email {
            self.email = email;
        }
        if let Some(full_name) = request.full_name {
            self.full_name = Some(full_name);
        }
        if let Some(profile_picture) = request.profile_picture {
            self.profile_picture = Some(profile_picture);
        }
        if let Some(preferences) = request.preferences {
            if let Some(language) = preferences.language {
                self.preferences.language = language;
            }
            if let Some(dark_mode) = preferences.dark_mode {
                self.preferences.dark_mode = dark_mode;
            }
            if let Some(dietary) = preferences.dietary_preferences {
                self.preferences.dietary_preferences = dietary;
            }
            if let Some(cuisines) = preferences.favorite_cuisines {
                self.preferences.favorite_cuisines = cuisines;
            }
            if let Some(prices) = preferences.price_range_preference {
                self.preferences.price_range_preference = Some(prices);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_update_merges_preferences() {
        let mut user = User::new(
            "a@example.com".to_string(),
            "alice".to_string(),
            None,
            None,
            UserRole::User,
            UserPreferences::default(),
        );

        user.update(UpdateUserRequest {
            preferences: Some(UpdatePreferencesRequest {
                dark_mode: Some(true),
                favorite_cuisines: Some(vec![Cuisine::Thai]),
                ..Default::default()
            }),
            ..Default::default()
        });

        assert!(user.preferences.dark_mode);
        assert_eq!(user.preferences.favorite_cuisines, vec![Cuisine::Thai]);
        // Untouched preference fields keep defaults
        assert_eq!(user.preferences.language, Language::English);
        assert_eq!(user.email, "a@example.com");
    }

    #[test]
    fn test_auth_user_role_check() {
        let admin = AuthUser {
            id: "1".to_string(),
            username: "admin".to_string(),
            role: UserRole::Admin,
        };
        let user = AuthUser {
            id: "2".to_string(),
            username: "bob".to_string(),
            role: UserRole::User,
        };
        assert!(admin.is_admin());
        assert!(!user.is_admin());
    }
}
