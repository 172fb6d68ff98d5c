//! HTTP route handlers for the API.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                - Liveness check
//! GET    /health/ready          - Readiness check (store ping)
//!
//! # Accounts
//! POST   /api/register          - Register a user
//! POST   /api/login             - Verify credentials
//! PUT    /api/users/{email}     - Patch the user matched by email
//! DELETE /api/users/{email}     - Delete the user matched by email
//!
//! # Vendors
//! GET    /api/vendors           - Every user as a vendor, with a rating
//!
//! # Orders
//! POST   /api/confirm-payment   - Record an order
//! ```

pub mod auth;
pub mod health;
pub mod orders;
pub mod users;
pub mod vendors;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::state::AppState;

/// Create the `/api` routes router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route(
            "/users/{email}",
            put(users::update_user).delete(users::delete_user),
        )
        .route("/vendors", get(vendors::list_vendors))
        .route("/confirm-payment", post(orders::confirm_payment))
}

/// Create the health check router.
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
}

/// Create the complete router with every route.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(health_routes())
        .nest("/api", api_routes())
}
