use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use plateful_rs::config::{
    AuthConfig, Config, ObservabilityConfig, ServerConfig, UploadConfig,
};
use plateful_rs::{create_router, AppState};

pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "adminpassword";

/// A fully wired application router with empty in-memory stores and the
/// bootstrap admin account, driven through tower::ServiceExt::oneshot.
pub struct TestApp {
    router: Router,
}

fn test_config() -> Config {
    let upload_dir = std::env::temp_dir()
        .join("plateful-it")
        .join(Uuid::new_v4().to_string());

    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8080,
            request_timeout_seconds: 30,
            max_request_size: 1024 * 1024,
        },
        auth: AuthConfig {
            token_ttl_minutes: 30,
            admin_username: ADMIN_USERNAME.to_string(),
            admin_password: ADMIN_PASSWORD.to_string(),
            admin_email: "admin@example.com".to_string(),
        },
        uploads: UploadConfig {
            upload_dir: upload_dir.to_string_lossy().into_owned(),
            max_file_size: 1024 * 1024,
        },
        observability: ObservabilityConfig {
            service_name: "plateful-rs".to_string(),
            service_version: env!("CARGO_PKG_VERSION").to_string(),
            log_level: "info".to_string(),
            enable_json_logging: false,
        },
    }
}

impl TestApp {
    pub async fn new() -> Self {
        let config = test_config();
        let state = AppState::new(&config).expect("Failed to build app state");
        state
            .bootstrap_admin(&config.auth)
            .await
            .expect("Failed to bootstrap admin");
        let router = create_router(state, &config.uploads.upload_dir);
        Self { router }
    }

    /// Send a request with an optional bearer token and JSON body
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .expect("Failed to build request"),
            None => builder.body(Body::empty()).expect("Failed to build request"),
        };

        self.send(request).await
    }

    /// Send a raw request (for form and multipart bodies)
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Request failed");

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read body");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, body)
    }

    /// Fetch a raw response (for static files)
    pub async fn get_raw(&self, uri: &str) -> (StatusCode, Vec<u8>) {
        let request = Request::builder()
            .method(Method::GET)
            .uri(uri)
            .body(Body::empty())
            .expect("Failed to build request");
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Request failed");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read body");
        (status, bytes.to_vec())
    }

    /// Log in with form credentials and return the bearer token
    pub async fn login(&self, username: &str, password: &str) -> String {
        let form = format!("username={}&password={}", username, password);
        let request = Request::builder()
            .method(Method::POST)
            .uri("/token")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(form))
            .expect("Failed to build request");

        let (status, body) = self.send(request).await;
        assert_eq!(status, StatusCode::OK, "login failed: {}", body);
        body["access_token"]
            .as_str()
            .expect("token missing")
            .to_string()
    }

    pub async fn admin_token(&self) -> String {
        self.login(ADMIN_USERNAME, ADMIN_PASSWORD).await
    }

    /// Register a fresh user account and return its bearer token
    pub async fn register_and_login(&self, username: &str) -> String {
        let (status, body) = self
            .request(
                Method::POST,
                "/register",
                None,
                Some(json!({
                    "email": format!("{}@example.com", username),
                    "username": username,
                    "password": "testpassword",
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "register failed: {}", body);
        self.login(username, "testpassword").await
    }

    /// Create a food item and return its id
    pub async fn create_food_item(&self, token: &str, body: Value) -> String {
        let (status, body) = self
            .request(Method::POST, "/food-items", Some(token), Some(body))
            .await;
        assert_eq!(status, StatusCode::CREATED, "create food failed: {}", body);
        body["id"].as_str().expect("id missing").to_string()
    }
}

/// A minimal valid food item body
pub fn food_item_body(name: &str, cuisine: &str) -> Value {
    json!({
        "name": name,
        "description": format!("{} test dish", name),
        "cuisine": cuisine,
        "category": "food",
        "dietary_preferences": ["none"],
        "meal_types": ["dinner"],
        "ingredients": ["salt", "pepper"],
        "preparation_time_minutes": 15
    })
}

/// A minimal valid restaurant body
pub fn restaurant_body(name: &str) -> Value {
    json!({
        "name": name,
        "description": format!("{} test kitchen", name),
        "cuisine_types": ["italian"],
        "address": "1 Main St",
        "city": "Portland",
        "country": "USA",
        "postal_code": "97201",
        "phone": "+1-503-555-0100",
        "price_range": "$$"
    })
}
