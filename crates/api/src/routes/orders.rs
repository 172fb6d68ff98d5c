//! Payment confirmation route handler.

use axum::{Json, extract::State};
use serde::Serialize;

use crate::error::{AppError, Result};
use crate::extract::ApiJson;
use crate::models::Order;
use crate::state::AppState;

/// Response for a recorded order.
#[derive(Debug, Serialize)]
pub struct ConfirmResponse {
    pub message: &'static str,
}

/// Record the posted order.
///
/// # Errors
///
/// Returns 400 for a malformed body, 500 if the store fails.
#[tracing::instrument(skip_all)]
pub async fn confirm_payment(
    State(state): State<AppState>,
    ApiJson(order): ApiJson<Order>,
) -> Result<Json<ConfirmResponse>> {
    state
        .gateway()
        .insert_order(order)
        .await
        .map_err(|e| AppError::store("Failed to confirm order.", e))?;

    tracing::info!("Order confirmed");
    Ok(Json(ConfirmResponse {
        message: "Order confirmed!",
    }))
}
