//! Router tests against the in-memory store.
//!
//! Every request goes through the full middleware stack via
//! `tower::ServiceExt::oneshot`; no network or MongoDB is needed.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
};
use serde_json::{Number, Value, json};
use tower::ServiceExt;

use bazaar_api::db::{InMemoryStore, OrderStore, UserStore};
use bazaar_api::gateway::Gateway;
use bazaar_api::middleware::REQUEST_ID_HEADER;
use bazaar_api::models::Order;
use bazaar_api::state::AppState;

fn app_with(store: Arc<InMemoryStore>) -> Router {
    let gateway = Gateway::connected(store, Duration::from_secs(5));
    bazaar_api::router(AppState::new(gateway))
}

fn app() -> (Router, Arc<InMemoryStore>) {
    let store = Arc::new(InMemoryStore::new());
    (app_with(store.clone()), store)
}

fn request(method: Method, uri: &str, body: Option<&Value>) -> Request<Body> {
    let builder = Request::builder().method(method).uri(uri);
    match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(request(method, uri, body.as_ref()))
        .await
        .unwrap();

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

async fn register(app: &Router, name: &str, email: &str, password: &str) -> (StatusCode, Value) {
    call(
        app,
        Method::POST,
        "/api/register",
        Some(json!({ "name": name, "email": email, "password": password })),
    )
    .await
}

async fn login(app: &Router, email: &str, password: &str) -> (StatusCode, Value) {
    call(
        app,
        Method::POST,
        "/api/login",
        Some(json!({ "email": email, "password": password })),
    )
    .await
}

// =============================================================================
// Accounts
// =============================================================================

#[tokio::test]
async fn register_then_login_returns_same_user() {
    let (app, _store) = app();

    let (status, body) = register(&app, "A", "a@x.com", "p").await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Registration successful");
    assert_eq!(body["user"]["name"], "A");
    assert_eq!(body["user"]["email"], "a@x.com");
    assert!(body["user"].get("password").is_none());

    let (status, logged_in) = login(&app, "a@x.com", "p").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(logged_in["message"], "Login successful");
    assert_eq!(logged_in["user"]["id"], body["user"]["id"]);
    assert!(logged_in["user"]["id"].is_string());
}

async fn post_form(app: &Router, uri: &str, body: &'static str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

#[tokio::test]
async fn register_and_login_accept_form_bodies() {
    let (app, _store) = app();

    let (status, registered) = post_form(
        &app,
        "/api/register",
        "name=Form+User&email=form%40x.com&password=p%26q",
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(registered["user"]["email"], "form@x.com");
    assert_eq!(registered["user"]["name"], "Form User");

    let (status, logged_in) = post_form(&app, "/api/login", "email=form%40x.com&password=p%26q").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(logged_in["user"]["id"], registered["user"]["id"]);

    assert_eq!(login(&app, "form@x.com", "p&q").await.0, StatusCode::OK);

    let (status, body) = post_form(&app, "/api/login", "email=form%40x.com").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn duplicate_registration_is_rejected() {
    let (app, store) = app();

    register(&app, "A", "a@x.com", "p").await;
    let (status, body) = register(&app, "A again", "a@x.com", "q").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "Email already exists" }));
    assert_eq!(store.user_count().await, 1);
}

#[tokio::test]
async fn concurrent_registrations_create_one_user() {
    let (app, store) = app();

    let attempts: Vec<_> = (0..4)
        .map(|n| {
            let app = app.clone();
            tokio::spawn(async move {
                register(&app, &format!("Racer {n}"), "race@x.com", "p")
                    .await
                    .0
            })
        })
        .collect();

    let mut created = 0;
    for attempt in attempts {
        match attempt.await.unwrap() {
            StatusCode::CREATED => created += 1,
            status => assert_eq!(status, StatusCode::BAD_REQUEST),
        }
    }

    assert_eq!(created, 1);
    assert_eq!(store.user_count().await, 1);
}

#[tokio::test]
async fn login_failures_share_one_message() {
    let (app, _store) = app();
    register(&app, "A", "a@x.com", "p").await;

    let (status, wrong_password) = login(&app, "a@x.com", "nope").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, unknown_email) = login(&app, "ghost@x.com", "p").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert_eq!(wrong_password, json!({ "error": "Invalid email or password" }));
    assert_eq!(wrong_password, unknown_email);
}

#[tokio::test]
async fn stored_password_is_hashed() {
    let (app, store) = app();
    register(&app, "A", "a@x.com", "plain-secret").await;

    let user = store.find_user_by_email("a@x.com").await.unwrap().unwrap();
    assert_ne!(user.password_hash, "plain-secret");
    assert!(!user.password_hash.contains("plain-secret"));
}

#[tokio::test]
async fn malformed_bodies_are_bad_requests() {
    let (app, store) = app();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/api/register")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert!(body["error"].is_string());

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/register",
        Some(json!({ "email": "a@x.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    assert_eq!(store.user_count().await, 0);
}

// =============================================================================
// Update / delete
// =============================================================================

#[tokio::test]
async fn update_merges_allowed_fields() {
    let (app, store) = app();
    let (_, registered) = register(&app, "A", "a@x.com", "p").await;

    let (status, body) = call(
        &app,
        Method::PUT,
        "/api/users/a@x.com",
        Some(json!({
            "location": "Lagos",
            "products": [{ "sku": "p1" }],
            "password": "new-password"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], registered["user"]["id"]);
    assert_eq!(body["name"], "A");
    assert_eq!(body["email"], "a@x.com");

    let user = store.find_user_by_email("a@x.com").await.unwrap().unwrap();
    assert_eq!(user.location.as_deref(), Some("Lagos"));
    assert_eq!(user.products, vec![json!({ "sku": "p1" })]);
    assert_ne!(user.password_hash, "new-password");

    assert_eq!(login(&app, "a@x.com", "new-password").await.0, StatusCode::OK);
    assert_eq!(login(&app, "a@x.com", "p").await.0, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn update_can_change_email() {
    let (app, _store) = app();
    register(&app, "A", "a@x.com", "p").await;

    let (status, body) = call(
        &app,
        Method::PUT,
        "/api/users/a@x.com",
        Some(json!({ "email": "new@x.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "new@x.com");

    assert_eq!(login(&app, "new@x.com", "p").await.0, StatusCode::OK);
    assert_eq!(login(&app, "a@x.com", "p").await.0, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn update_missing_user_is_not_found() {
    let (app, store) = app();

    let (status, body) = call(
        &app,
        Method::PUT,
        "/api/users/nobody@x.com",
        Some(json!({ "name": "Ghost" })),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "User not found" }));
    assert_eq!(store.user_count().await, 0);
}

#[tokio::test]
async fn update_missing_user_with_taken_email_is_not_found() {
    let (app, store) = app();
    register(&app, "A", "a@x.com", "p").await;

    let (status, body) = call(
        &app,
        Method::PUT,
        "/api/users/nobody@x.com",
        Some(json!({ "email": "a@x.com" })),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "User not found" }));
    assert_eq!(store.user_count().await, 1);
}

#[tokio::test]
async fn update_rejects_unknown_fields() {
    let (app, store) = app();
    register(&app, "A", "a@x.com", "p").await;

    let (status, body) = call(
        &app,
        Method::PUT,
        "/api/users/a@x.com",
        Some(json!({ "name": "B", "role": "admin" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let user = store.find_user_by_email("a@x.com").await.unwrap().unwrap();
    assert_eq!(user.name, "A");
}

#[tokio::test]
async fn update_rejects_taken_email() {
    let (app, store) = app();
    register(&app, "A", "a@x.com", "p").await;
    register(&app, "B", "b@x.com", "p").await;

    let (status, body) = call(
        &app,
        Method::PUT,
        "/api/users/a@x.com",
        Some(json!({ "email": "b@x.com" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "Email already exists" }));
    assert!(store.find_user_by_email("a@x.com").await.unwrap().is_some());
}

#[tokio::test]
async fn delete_removes_user() {
    let (app, store) = app();
    register(&app, "A", "a@x.com", "p").await;

    let (status, body) = call(&app, Method::DELETE, "/api/users/a@x.com", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "User deleted successfully" }));
    assert_eq!(store.user_count().await, 0);

    assert_eq!(login(&app, "a@x.com", "p").await.0, StatusCode::BAD_REQUEST);

    let (status, body) = call(&app, Method::DELETE, "/api/users/a@x.com", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "User not found" }));
}

// =============================================================================
// Vendors
// =============================================================================

#[tokio::test]
async fn vendors_lists_every_user_with_a_rating() {
    let (app, _store) = app();
    for n in 0..3 {
        register(&app, &format!("V{n}"), &format!("v{n}@x.com"), "p").await;
    }

    for _ in 0..2 {
        let (status, body) = call(&app, Method::GET, "/api/vendors", None).await;
        assert_eq!(status, StatusCode::OK);

        let vendors = body.as_array().unwrap();
        assert_eq!(vendors.len(), 3);
        for vendor in vendors {
            let rating = vendor["rating"].as_f64().unwrap();
            assert!((1.0..=5.0).contains(&rating));
            assert!(vendor["image"].is_string());
            assert!(vendor["id"].is_string());
            assert!(vendor.get("passwordHash").is_none());
            assert!(vendor.get("password_hash").is_none());
        }
    }
}

#[tokio::test]
async fn vendors_empty_store_is_empty_list() {
    let (app, _store) = app();
    let (status, body) = call(&app, Method::GET, "/api/vendors", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

// =============================================================================
// Orders
// =============================================================================

#[tokio::test]
async fn confirm_payment_records_order() {
    let (app, store) = app();

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/confirm-payment",
        Some(json!({
            "customerName": "B",
            "items": [{ "sku": "x" }],
            "totalAmount": 10,
            "orderDate": "2024-01-01",
            "orderId": 7
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "Order confirmed!" }));

    let expected = Order {
        customer_name: Some("B".to_string()),
        customer_address: None,
        items: vec![json!({ "sku": "x" })],
        total_amount: Some(10.0),
        order_date: Some("2024-01-01".to_string()),
        order_id: Some(Number::from(7)),
    };
    assert_eq!(store.list_orders().await.unwrap(), vec![expected]);
}

#[tokio::test]
async fn confirm_payment_keeps_fractional_order_id() {
    let (app, store) = app();

    for body in [json!({ "orderId": 7.5 }), json!({ "orderId": 7.0 }), json!({ "items": null })] {
        let (status, response) = call(&app, Method::POST, "/api/confirm-payment", Some(body)).await;
        assert_eq!(status, StatusCode::OK, "{response}");
    }

    let orders = store.list_orders().await.unwrap();
    assert_eq!(orders.len(), 3);
    assert_eq!(orders[0].order_id.as_ref().and_then(Number::as_f64), Some(7.5));
    assert!(orders[2].items.is_empty());
}

#[tokio::test]
async fn confirm_payment_accepts_empty_order() {
    let (app, store) = app();

    let (status, _) = call(&app, Method::POST, "/api/confirm-payment", Some(json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(store.order_count().await, 1);
}

// =============================================================================
// Store failures
// =============================================================================

#[tokio::test]
async fn not_connected_gateway_fails_every_api_route() {
    let app = bazaar_api::router(AppState::new(Gateway::not_connected(Duration::from_secs(1))));

    let cases = [
        (
            Method::POST,
            "/api/register",
            Some(json!({ "name": "A", "email": "a@x.com", "password": "p" })),
            "Internal server error",
        ),
        (
            Method::POST,
            "/api/login",
            Some(json!({ "email": "a@x.com", "password": "p" })),
            "Internal server error",
        ),
        (
            Method::PUT,
            "/api/users/a@x.com",
            Some(json!({ "name": "B" })),
            "Update failed",
        ),
        (Method::DELETE, "/api/users/a@x.com", None, "Delete failed"),
        (Method::GET, "/api/vendors", None, "Failed to fetch vendors"),
        (
            Method::POST,
            "/api/confirm-payment",
            Some(json!({ "orderId": 1 })),
            "Failed to confirm order.",
        ),
    ];

    for (method, uri, body, message) in cases {
        let (status, response) = call(&app, method, uri, body).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{uri}");
        assert_eq!(response, json!({ "error": message }), "{uri}");
    }

    let (status, _) = call(&app, Method::GET, "/health/ready", None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn slow_store_times_out() {
    let store = Arc::new(InMemoryStore::with_latency(Duration::from_millis(500)));
    let gateway = Gateway::connected(store, Duration::from_millis(20));
    let app = bazaar_api::router(AppState::new(gateway));

    let (status, body) = call(&app, Method::GET, "/api/vendors", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "Failed to fetch vendors" }));
}

// =============================================================================
// Health and middleware
// =============================================================================

#[tokio::test]
async fn health_endpoints() {
    let (app, _store) = app();

    let response = app
        .clone()
        .oneshot(request(Method::GET, "/health", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"ok");

    let (status, _) = call(&app, Method::GET, "/health/ready", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn responses_carry_request_id_and_cors() {
    let (app, _store) = app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/vendors")
                .header(header::ORIGIN, "http://shop.example")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key(REQUEST_ID_HEADER));
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "*"
    );
}
