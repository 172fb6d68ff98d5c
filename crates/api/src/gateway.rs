//! Persistence gateway shared by all handlers.
//!
//! The gateway is created once at startup. It is either connected to a
//! [`Store`] or explicitly not connected (the startup connection failed);
//! every operation checks that state first and fails with
//! [`RepositoryError::Unavailable`] when there is no store. Each operation
//! is a single store round trip bounded by the configured timeout.

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::db::{RepositoryError, Store};
use crate::models::Order;
use crate::models::user::{NewUser, User, UserUpdate};

/// Process-scoped handle to the store.
#[derive(Clone)]
pub struct Gateway {
    store: Option<Arc<dyn Store>>,
    timeout: Duration,
}

impl fmt::Debug for Gateway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Gateway")
            .field("connected", &self.is_connected())
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Gateway {
    /// Create a gateway backed by `store`.
    #[must_use]
    pub fn connected(store: Arc<dyn Store>, timeout: Duration) -> Self {
        Self {
            store: Some(store),
            timeout,
        }
    }

    /// Create a gateway with no store; every operation fails.
    #[must_use]
    pub const fn not_connected(timeout: Duration) -> Self {
        Self {
            store: None,
            timeout,
        }
    }

    /// Whether a store connection was established.
    #[must_use]
    pub const fn is_connected(&self) -> bool {
        self.store.is_some()
    }

    fn store(&self) -> Result<&dyn Store, RepositoryError> {
        self.store.as_deref().ok_or_else(|| {
            RepositoryError::Unavailable("store connection was not established".to_owned())
        })
    }

    async fn bounded<T, F>(&self, operation: F) -> Result<T, RepositoryError>
    where
        F: Future<Output = Result<T, RepositoryError>>,
    {
        tokio::time::timeout(self.timeout, operation)
            .await
            .map_err(|_| RepositoryError::Timeout(self.timeout))?
    }

    // =========================================================================
    // Users
    // =========================================================================

    /// Get a user by email.
    ///
    /// # Errors
    ///
    /// Returns a `RepositoryError` if the store is unavailable, times out or fails.
    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        let store = self.store()?;
        self.bounded(store.find_user_by_email(email)).await
    }

    /// Insert a user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email is taken, or another
    /// `RepositoryError` if the store is unavailable, times out or fails.
    pub async fn insert_user(&self, user: NewUser) -> Result<User, RepositoryError> {
        let store = self.store()?;
        self.bounded(store.insert_user(user)).await
    }

    /// Overlay `update` onto the user matched by `email`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the new email is taken, or
    /// another `RepositoryError` if the store is unavailable, times out or fails.
    pub async fn update_user_by_email(
        &self,
        email: &str,
        update: UserUpdate,
    ) -> Result<Option<User>, RepositoryError> {
        let store = self.store()?;
        self.bounded(store.update_user_by_email(email, update)).await
    }

    /// Delete the user matched by `email`; `true` if one was removed.
    ///
    /// # Errors
    ///
    /// Returns a `RepositoryError` if the store is unavailable, times out or fails.
    pub async fn delete_user_by_email(&self, email: &str) -> Result<bool, RepositoryError> {
        let store = self.store()?;
        self.bounded(store.delete_user_by_email(email)).await
    }

    /// Get every user.
    ///
    /// # Errors
    ///
    /// Returns a `RepositoryError` if the store is unavailable, times out or fails.
    pub async fn list_users(&self) -> Result<Vec<User>, RepositoryError> {
        let store = self.store()?;
        self.bounded(store.list_users()).await
    }

    // =========================================================================
    // Orders
    // =========================================================================

    /// Record an order.
    ///
    /// # Errors
    ///
    /// Returns a `RepositoryError` if the store is unavailable, times out or fails.
    pub async fn insert_order(&self, order: Order) -> Result<(), RepositoryError> {
        let store = self.store()?;
        self.bounded(store.insert_order(order)).await
    }

    /// Get every order, oldest first.
    ///
    /// # Errors
    ///
    /// Returns a `RepositoryError` if the store is unavailable, times out or fails.
    pub async fn list_orders(&self) -> Result<Vec<Order>, RepositoryError> {
        let store = self.store()?;
        self.bounded(store.list_orders()).await
    }

    /// Check that the store answers.
    ///
    /// # Errors
    ///
    /// Returns a `RepositoryError` if the store is unavailable, times out or fails.
    pub async fn ping(&self) -> Result<(), RepositoryError> {
        let store = self.store()?;
        self.bounded(store.ping()).await
    }
}
