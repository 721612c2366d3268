use std::sync::Arc;

use accounts_service::domain::auth::ports::AuthServicePort;
use accounts_service::domain::auth::ports::Clock;
use accounts_service::domain::auth::ports::SystemClock;
use accounts_service::domain::auth::service::AuthService;
use accounts_service::domain::user::models::EmailAddress;
use accounts_service::domain::user::models::User;
use accounts_service::domain::user::models::UserId;
use accounts_service::domain::user::models::Username;
use accounts_service::domain::user::ports::UserRepository;
use accounts_service::domain::user::ports::UserServicePort;
use accounts_service::domain::user::service::UserService;
use accounts_service::inbound::http::router::create_router;
use accounts_service::inbound::http::router::AppState;
use accounts_service::outbound::repositories::InMemoryUserRepository;
use chrono::Duration;
use chrono::Utc;
use session_auth::PasswordHasher;
use session_auth::Role;
use session_auth::TokenCodec;

/// Secret used to sign tokens in tests. Long enough for HMAC-SHA256.
pub const TEST_TOKEN_SECRET: &[u8] = b"test-secret-key-for-token-signing-32-bytes!";

/// Test application that spawns a real server
pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub repository: Arc<InMemoryUserRepository>,
    pub api_client: reqwest::Client,
    pub token_codec: Arc<TokenCodec>,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let repository = Arc::new(InMemoryUserRepository::new());
        let token_codec = Arc::new(TokenCodec::new(TEST_TOKEN_SECRET, Duration::minutes(30)));
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);

        let auth_service: Arc<dyn AuthServicePort> = Arc::new(AuthService::new(
            Arc::clone(&repository),
            Arc::clone(&token_codec),
            Arc::clone(&clock),
            Role::User,
        ));
        let user_service: Arc<dyn UserServicePort> =
            Arc::new(UserService::new(Arc::clone(&repository)));

        let state = AppState {
            auth_service,
            user_service,
            token_codec: Arc::clone(&token_codec),
            clock,
            min_password_length: 6,
        };

        let router = create_router(state);

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            port,
            repository,
            api_client: reqwest::Client::builder()
                .build()
                .expect("Failed to create reqwest client"),
            token_codec,
        }
    }

    /// Insert a user directly into the repository, bypassing the HTTP API.
    pub async fn seed_user(
        &self,
        username: &str,
        email: &str,
        password: &str,
        role: Role,
        enabled: bool,
    ) -> User {
        let user = User {
            id: UserId::new(),
            username: Username::new(username.to_string()).unwrap(),
            email: EmailAddress::new(email.to_string()).unwrap(),
            password_hash: PasswordHasher::new().hash(password).unwrap(),
            role,
            enabled,
            created_at: Utc::now(),
        };

        self.repository
            .create(user)
            .await
            .expect("Failed to seed user")
    }

    /// Log a seeded user in and return their bearer token.
    pub async fn login_token(&self, username: &str, password: &str) -> String {
        let response = self
            .post("/api/auth/login")
            .json(&serde_json::json!({
                "username": username,
                "password": password,
            }))
            .send()
            .await
            .expect("Failed to execute login request");
        assert_eq!(response.status().as_u16(), 200);

        let body: serde_json::Value = response.json().await.unwrap();
        body["data"]["token"].as_str().unwrap().to_string()
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(&format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(&format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// Helper to make POST request with Bearer token
    pub fn post_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.post(path).bearer_auth(token)
    }

    /// Helper to make PUT request with Bearer token
    pub fn put_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client
            .put(&format!("{}{}", self.address, path))
            .bearer_auth(token)
    }

    /// Helper to make DELETE request with Bearer token
    pub fn delete_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client
            .delete(&format!("{}{}", self.address, path))
            .bearer_auth(token)
    }
}
