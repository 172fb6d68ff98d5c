//! Black-box tests for a running Bazaar API.
//!
//! # Running Tests
//!
//! ```bash
//! # Start MongoDB and the API server
//! MONGO_URI=mongodb://localhost:27017/bazaar_test cargo run -p bazaar-api
//!
//! # Run the ignored tests against it
//! API_BASE_URL=http://localhost:5050 cargo test -p bazaar-integration-tests -- --ignored
//! ```

use reqwest::{Client, Response};
use serde_json::{Value, json};
use uuid::Uuid;

/// Base URL for the API (configurable via `API_BASE_URL`).
#[must_use]
pub fn api_base_url() -> String {
    std::env::var("API_BASE_URL").unwrap_or_else(|_| "http://localhost:5050".to_string())
}

/// An email that no other test run will use.
#[must_use]
pub fn unique_email(prefix: &str) -> String {
    format!("{prefix}-{}@test.bazaar", Uuid::new_v4().simple())
}

/// HTTP client bound to the API base URL.
#[derive(Debug, Clone)]
pub struct TestContext {
    pub client: Client,
    pub base_url: String,
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

impl TestContext {
    /// Create a context for [`api_base_url`].
    #[must_use]
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            base_url: api_base_url(),
        }
    }

    /// Absolute URL for `path`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// POST `/api/register`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be sent.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> reqwest::Result<Response> {
        self.client
            .post(self.url("/api/register"))
            .json(&json!({ "name": name, "email": email, "password": password }))
            .send()
            .await
    }

    /// POST `/api/login`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be sent.
    pub async fn login(&self, email: &str, password: &str) -> reqwest::Result<Response> {
        self.client
            .post(self.url("/api/login"))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
    }

    /// PUT `/api/users/{email}`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be sent.
    pub async fn update_user(&self, email: &str, patch: &Value) -> reqwest::Result<Response> {
        self.client
            .put(self.url(&format!("/api/users/{email}")))
            .json(patch)
            .send()
            .await
    }

    /// DELETE `/api/users/{email}`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be sent.
    pub async fn delete_user(&self, email: &str) -> reqwest::Result<Response> {
        self.client
            .delete(self.url(&format!("/api/users/{email}")))
            .send()
            .await
    }
}
