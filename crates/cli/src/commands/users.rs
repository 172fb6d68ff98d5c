//! User inspection command.

use bazaar_api::db::UserStore;
use bazaar_api::models::UserSummary;

use super::{CommandError, connect, print_json};

/// Print every user's id, name and email. Password hashes are never printed.
///
/// # Errors
///
/// Returns an error if the connection or the query fails.
pub async fn list() -> Result<(), CommandError> {
    let store = connect().await?;

    let users = store.list_users().await?;
    let summaries: Vec<UserSummary> = users.iter().map(UserSummary::from).collect();

    tracing::info!(count = summaries.len(), "Users loaded");
    print_json(&summaries)
}
