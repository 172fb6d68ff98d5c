//! In-memory store for tests and local development.

use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use bazaar_core::UserId;

use super::{OrderStore, RepositoryError, Store, UserStore};
use crate::models::Order;
use crate::models::user::{NewUser, User, UserUpdate};

/// In-memory implementation of [`Store`].
///
/// Enforces email uniqueness like the MongoDB index does. Suitable for
/// testing and development. Not for production use.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    users: RwLock<Vec<User>>,
    orders: RwLock<Vec<Order>>,
    latency: Option<Duration>,
}

impl InMemoryStore {
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store that sleeps for `latency` before every
    /// operation, to stand in for a slow or hung database.
    #[must_use]
    pub fn with_latency(latency: Duration) -> Self {
        Self {
            latency: Some(latency),
            ..Self::default()
        }
    }

    /// Number of stored users.
    pub async fn user_count(&self) -> usize {
        self.users.read().await.len()
    }

    /// Number of stored orders.
    pub async fn order_count(&self) -> usize {
        self.orders.read().await.len()
    }

    async fn round_trip(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }
}

fn conflict() -> RepositoryError {
    RepositoryError::Conflict("email already exists".to_owned())
}

#[async_trait]
impl UserStore for InMemoryStore {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        self.round_trip().await;
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn insert_user(&self, user: NewUser) -> Result<User, RepositoryError> {
        self.round_trip().await;
        let mut users = self.users.write().await;

        if users.iter().any(|u| u.email == user.email) {
            return Err(conflict());
        }

        let user = User {
            id: UserId::new(Uuid::new_v4().to_string()),
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            location: None,
            products: Vec::new(),
        };
        users.push(user.clone());
        Ok(user)
    }

    async fn update_user_by_email(
        &self,
        email: &str,
        update: UserUpdate,
    ) -> Result<Option<User>, RepositoryError> {
        self.round_trip().await;
        let mut users = self.users.write().await;

        let Some(index) = users.iter().position(|u| u.email == email) else {
            return Ok(None);
        };

        if let Some(new_email) = &update.email
            && new_email != email
            && users.iter().any(|u| &u.email == new_email)
        {
            return Err(conflict());
        }

        let Some(user) = users.get_mut(index) else {
            return Ok(None);
        };

        update.apply_to(user);
        Ok(Some(user.clone()))
    }

    async fn delete_user_by_email(&self, email: &str) -> Result<bool, RepositoryError> {
        self.round_trip().await;
        let mut users = self.users.write().await;
        let before = users.len();
        users.retain(|u| u.email != email);
        Ok(users.len() < before)
    }

    async fn list_users(&self) -> Result<Vec<User>, RepositoryError> {
        self.round_trip().await;
        Ok(self.users.read().await.clone())
    }
}

#[async_trait]
impl OrderStore for InMemoryStore {
    async fn insert_order(&self, order: Order) -> Result<(), RepositoryError> {
        self.round_trip().await;
        self.orders.write().await.push(order);
        Ok(())
    }

    async fn list_orders(&self) -> Result<Vec<Order>, RepositoryError> {
        self.round_trip().await;
        Ok(self.orders.read().await.clone())
    }
}

#[async_trait]
impl Store for InMemoryStore {
    async fn ping(&self) -> Result<(), RepositoryError> {
        self.round_trip().await;
        Ok(())
    }
}
