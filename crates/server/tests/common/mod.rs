//! Common test utilities for E2E testing with mocks.
//!
//! Builds an in-process gateway over a mock marketplace, an in-memory
//! session store and a scripted librarian, so every route can be exercised
//! without a running backend or model API.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use bookbridge_core::config::ServerConfig;
use bookbridge_core::librarian::{LlmLibrarian, OfflineLibrarian};
use bookbridge_core::testing::{MockLlmClient, MockMarketplace};
use bookbridge_core::{Config, Librarian, MemorySessionStore};
use bookbridge_server::state::AppState;

/// Re-export fixtures for test convenience
pub use bookbridge_core::testing::fixtures;

/// Credentials of the demo account seeded into every fixture.
pub const DEMO_EMAIL: &str = "rahul.kumar@example.com";
pub const DEMO_PASSWORD: &str = "secret1";

/// Body served for unknown non-API paths.
pub const INDEX_HTML: &str = "<!doctype html><title>BookBridge</title>";

/// Test fixture for E2E testing with mock dependencies.
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_browse() {
///     let fixture = TestFixture::new().await;
///     let response = fixture.get("/api/v1/listings?tag=jee").await;
///     assert_eq!(response.status, 200);
/// }
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Mock backend - seed listings, inject errors, inspect calls
    pub market: Arc<MockMarketplace>,
    /// Scripted model client, present when the fixture uses the model librarian
    pub llm: Option<Arc<MockLlmClient>>,
    /// Holds the static UI directory
    pub temp_dir: TempDir,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
    pub text: String,
}

impl TestFixture {
    /// Create a new test fixture with default mocks.
    pub async fn new() -> Self {
        Self::with_config(TestConfig::default()).await
    }

    /// Create a test fixture with custom configuration.
    pub async fn with_config(test_config: TestConfig) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let static_dir = temp_dir.path().join("web");
        std::fs::create_dir_all(&static_dir).expect("Failed to create static dir");
        std::fs::write(static_dir.join("index.html"), INDEX_HTML)
            .expect("Failed to write index.html");

        let market = Arc::new(MockMarketplace::with_listings(if test_config.empty_backend {
            Vec::new()
        } else {
            fixtures::sample_listings()
        }));
        market
            .add_account(DEMO_EMAIL, DEMO_PASSWORD, fixtures::mock_user())
            .await;

        let llm = test_config
            .model_librarian
            .then(|| Arc::new(MockLlmClient::new()));
        let librarian: Arc<dyn Librarian> = match &llm {
            Some(client) => Arc::new(LlmLibrarian::new(Arc::clone(client))),
            None => Arc::new(OfflineLibrarian::instant()),
        };

        let config = Config {
            server: ServerConfig {
                host: std::net::IpAddr::V4(std::net::Ipv4Addr::LOCALHOST),
                port: 0, // Not used for in-process testing
                static_dir,
            },
            ..Default::default()
        };

        let state = Arc::new(AppState::new(
            config,
            Arc::clone(&market) as Arc<dyn bookbridge_core::Marketplace>,
            librarian,
            Arc::new(MemorySessionStore::new()),
        ));

        let router = bookbridge_server::api::create_router(state);

        Self {
            router,
            market,
            llm,
            temp_dir,
        }
    }

    /// Log in as the demo account.
    pub async fn login(&self) -> TestResponse {
        let response = self
            .post(
                "/api/v1/auth/login",
                serde_json::json!({ "email": DEMO_EMAIL, "password": DEMO_PASSWORD }),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "login failed: {}", response.text);
        response
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path, None).await
    }

    /// Send a POST request with JSON body.
    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        self.request("POST", path, Some(body)).await
    }

    /// Send a POST request without a body.
    pub async fn post_empty(&self, path: &str) -> TestResponse {
        self.request("POST", path, None).await
    }

    /// Send a PUT request with JSON body.
    pub async fn put(&self, path: &str, body: Value) -> TestResponse {
        self.request("PUT", path, Some(body)).await
    }

    /// Send a DELETE request.
    pub async fn delete(&self, path: &str) -> TestResponse {
        self.request("DELETE", path, None).await
    }

    /// Send a POST request with a raw body and content type.
    pub async fn post_raw(&self, path: &str, body: Vec<u8>, content_type: &str) -> TestResponse {
        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header("Content-Type", content_type)
            .body(Body::from(body))
            .unwrap();
        self.send(request).await
    }

    async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        let mut request_builder = Request::builder().method(method).uri(path);

        let body = if let Some(json_body) = body {
            request_builder = request_builder.header("Content-Type", "application/json");
            Body::from(serde_json::to_vec(&json_body).unwrap())
        } else {
            Body::empty()
        };

        self.send(request_builder.body(body).unwrap()).await
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let text = String::from_utf8_lossy(&body_bytes).into_owned();
        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
        };

        TestResponse { status, body, text }
    }
}

/// Configuration for test fixture.
#[derive(Debug, Clone, Default)]
pub struct TestConfig {
    /// Answer librarian queries through a scripted model client
    pub model_librarian: bool,
    /// Start the backend with no listings
    pub empty_backend: bool,
}

impl TestConfig {
    pub fn with_model_librarian() -> Self {
        Self {
            model_librarian: true,
            ..Default::default()
        }
    }

    pub fn with_empty_backend() -> Self {
        Self {
            empty_backend: true,
            ..Default::default()
        }
    }
}

/// Build a multipart body with one `images` part per file name.
pub fn multipart_images(boundary: &str, file_names: &[&str]) -> Vec<u8> {
    let mut body = Vec::new();
    for name in file_names {
        body.extend_from_slice(
            format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"images\"; filename=\"{name}\"\r\nContent-Type: image/jpeg\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(b"\xff\xd8\xff\xe0fake-jpeg");
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());
    body
}

/// Helper to assert a response has expected status.
#[macro_export]
macro_rules! assert_status {
    ($response:expr, $status:expr) => {{
        let response = &$response;
        assert_eq!(
            response.status, $status,
            "Expected status {:?}, got {:?}. Body: {}",
            $status, response.status, response.text
        );
    }};
}
