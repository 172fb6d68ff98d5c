//! User update and delete route handlers.
//!
//! Users are addressed by email, the same key login uses.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::db::RepositoryError;
use crate::error::{AppError, Result};
use crate::extract::ApiJson;
use crate::models::{UserSummary, UserUpdate};
use crate::services::auth::hash_password;
use crate::state::AppState;

const USER_NOT_FOUND: &str = "User not found";

/// Update request body.
///
/// Only these fields can be changed; any other field is rejected.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub location: Option<String>,
    pub products: Option<Vec<Value>>,
}

impl UserPatch {
    /// Convert into a store update, hashing a new password.
    fn into_update(self) -> Result<UserUpdate> {
        let password_hash = self.password.as_deref().map(hash_password).transpose()?;

        Ok(UserUpdate {
            name: self.name,
            email: self.email,
            password_hash,
            location: self.location,
            products: self.products,
        })
    }
}

/// Response for a successful delete.
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub message: &'static str,
}

/// Apply a patch to the user matched by `email`.
///
/// # Errors
///
/// Returns 404 if no user has that email, 400 for unknown fields or an
/// email already used by another user, 500 if the store fails.
#[tracing::instrument(skip_all)]
pub async fn update_user(
    State(state): State<AppState>,
    Path(email): Path<String>,
    ApiJson(patch): ApiJson<UserPatch>,
) -> Result<Json<UserSummary>> {
    let update = patch.into_update()?;

    let user = state
        .gateway()
        .update_user_by_email(&email, update)
        .await
        .map_err(|e| match e {
            RepositoryError::Conflict(_) => AppError::BadRequest("Email already exists".to_string()),
            other => AppError::store("Update failed", other),
        })?
        .ok_or_else(|| AppError::NotFound(USER_NOT_FOUND.to_string()))?;

    tracing::info!(user_id = %user.id, "User updated");
    Ok(Json(UserSummary::from(&user)))
}

/// Delete the user matched by `email`.
///
/// # Errors
///
/// Returns 404 if no user has that email, 500 if the store fails.
#[tracing::instrument(skip_all)]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<DeleteResponse>> {
    let deleted = state
        .gateway()
        .delete_user_by_email(&email)
        .await
        .map_err(|e| AppError::store("Delete failed", e))?;

    if !deleted {
        return Err(AppError::NotFound(USER_NOT_FOUND.to_string()));
    }

    tracing::info!("User deleted");
    Ok(Json(DeleteResponse {
        message: "User deleted successfully",
    }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_patch_rejects_unknown_fields() {
        let result = serde_json::from_value::<UserPatch>(json!({
            "name": "B",
            "isAdmin": true
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_patch_hashes_password() {
        let patch: UserPatch = serde_json::from_value(json!({ "password": "new-secret" })).unwrap();
        let update = patch.into_update().unwrap();

        let hash = update.password_hash.unwrap();
        assert_ne!(hash, "new-secret");
        assert!(hash.starts_with("$argon2id$"));
        assert!(update.name.is_none());
    }

    #[test]
    fn test_empty_patch_is_empty_update() {
        let patch: UserPatch = serde_json::from_value(json!({})).unwrap();
        assert!(patch.into_update().unwrap().is_empty());
    }
}
