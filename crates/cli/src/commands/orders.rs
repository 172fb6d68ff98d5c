//! Order inspection command.

use bazaar_api::db::OrderStore;

use super::{CommandError, connect, print_json};

/// Print every recorded order, oldest first.
///
/// # Errors
///
/// Returns an error if the connection or the query fails.
pub async fn list() -> Result<(), CommandError> {
    let store = connect().await?;

    let orders = store.list_orders().await?;

    tracing::info!(count = orders.len(), "Orders loaded");
    print_json(&orders)
}
