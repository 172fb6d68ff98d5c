//! Registration and login route handlers.

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::extract::JsonOrForm;
use crate::models::UserSummary;
use crate::services::AuthService;
use crate::state::AppState;

/// Registration request body.
#[derive(Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Login request body.
#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response for a successful registration or login.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub message: &'static str,
    pub user: UserSummary,
}

/// Register a new user.
///
/// # Errors
///
/// Returns 400 if the email is already registered or the body is invalid,
/// 500 if the store fails.
#[tracing::instrument(skip_all)]
pub async fn register(
    State(state): State<AppState>,
    JsonOrForm(form): JsonOrForm<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>)> {
    let auth = AuthService::new(state.gateway());
    let user = auth.register(&form.name, &form.email, &form.password).await?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            message: "Registration successful",
            user: UserSummary::from(&user),
        }),
    ))
}

/// Verify credentials.
///
/// # Errors
///
/// Returns 400 if the email is unknown or the password is wrong,
/// 500 if the store fails.
#[tracing::instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    JsonOrForm(form): JsonOrForm<LoginRequest>,
) -> Result<Json<AuthResponse>> {
    let auth = AuthService::new(state.gateway());

    let user = match auth.login(&form.email, &form.password).await {
        Ok(user) => user,
        Err(e) => {
            tracing::debug!(error = %e, "Login failed");
            return Err(e.into());
        }
    };

    tracing::info!(user_id = %user.id, "User logged in");

    Ok(Json(AuthResponse {
        message: "Login successful",
        user: UserSummary::from(&user),
    }))
}
