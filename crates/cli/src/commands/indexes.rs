//! Index setup command.
//!
//! The API server creates the same index on startup; this command lets
//! deployments create it ahead of time and surfaces duplicate emails that
//! would prevent it.

use super::{CommandError, connect};

/// Ensure the unique `users.email` index exists.
///
/// # Errors
///
/// Returns an error if the connection fails or the index cannot be built.
pub async fn ensure() -> Result<(), CommandError> {
    let store = connect().await?;

    store.ensure_indexes().await?;

    tracing::info!("Indexes are up to date");
    Ok(())
}
