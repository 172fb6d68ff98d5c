//! Vendor listing route handler.

use axum::{Json, extract::State};
use rand::Rng;

use bazaar_core::Rating;

use crate::error::{AppError, Result};
use crate::models::{User, VendorView};
use crate::state::AppState;

/// List every user as a vendor.
///
/// Ratings are drawn fresh for every response.
///
/// # Errors
///
/// Returns 500 if the store fails.
#[tracing::instrument(skip_all)]
pub async fn list_vendors(State(state): State<AppState>) -> Result<Json<Vec<VendorView>>> {
    let users = state
        .gateway()
        .list_users()
        .await
        .map_err(|e| AppError::store("Failed to fetch vendors", e))?;

    let vendors = vendor_views(users, &mut rand::rng())?;
    tracing::debug!(count = vendors.len(), "Vendors listed");

    Ok(Json(vendors))
}

/// Project users into vendor views with a random rating each.
fn vendor_views<R: Rng>(users: Vec<User>, rng: &mut R) -> Result<Vec<VendorView>> {
    users
        .into_iter()
        .map(|user| {
            let rating = Rating::new(rng.random_range(Rating::MIN..=Rating::MAX))
                .map_err(|e| AppError::Internal(e.to_string()))?;
            Ok(VendorView::from_user(user, rating))
        })
        .collect()
}
