//! Order persistence.

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::doc;

use super::{MongoStore, RepositoryError};
use crate::models::Order;

/// Order record operations.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Record an order.
    async fn insert_order(&self, order: Order) -> Result<(), RepositoryError>;

    /// Get every order, oldest first.
    async fn list_orders(&self) -> Result<Vec<Order>, RepositoryError>;
}

#[async_trait]
impl OrderStore for MongoStore {
    async fn insert_order(&self, order: Order) -> Result<(), RepositoryError> {
        self.orders.insert_one(&order).await?;
        Ok(())
    }

    async fn list_orders(&self) -> Result<Vec<Order>, RepositoryError> {
        // ObjectIds grow with insertion time
        let orders = self
            .orders
            .find(doc! {})
            .sort(doc! { "_id": 1 })
            .await?
            .try_collect()
            .await?;
        Ok(orders)
    }
}
