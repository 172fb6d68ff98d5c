//! Persistence for the API.
//!
//! # Database: MongoDB
//!
//! ## Collections
//!
//! - `users` - Registered users, unique index on `email`
//! - `orders` - Orders recorded on payment confirmation
//!
//! Collections are schemaless; there are no migrations. The unique email
//! index is created on startup (and by `bazaar-cli indexes`).
//!
//! # Ports
//!
//! Handlers never talk to MongoDB directly. They go through the
//! [`Gateway`](crate::gateway::Gateway), which wraps any [`Store`]:
//! [`MongoStore`] in production and [`InMemoryStore`] in tests and local
//! development.

pub mod memory;
pub mod orders;
pub mod users;

use std::time::Duration;

use async_trait::async_trait;
use mongodb::bson::doc;
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::{ClientOptions, IndexOptions};
use mongodb::{Client, Collection, Database, IndexModel};
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

use crate::config::DEFAULT_DATABASE;
use crate::models::Order;

pub use memory::InMemoryStore;
pub use orders::OrderStore;
pub use users::{UserDocument, UserStore};

/// Server error code MongoDB reports for a unique index violation.
const DUPLICATE_KEY_CODE: i32 = 11000;

const USERS_COLLECTION: &str = "users";
const ORDERS_COLLECTION: &str = "orders";
const EMAIL_INDEX_NAME: &str = "email_unique";

/// Errors from store operations.
///
/// A lookup that matches nothing is not an error; it is reported as
/// `None` or `false` by the operation itself.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// No store connection is available.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// The store did not answer in time.
    #[error("store operation timed out after {0:?}")]
    Timeout(Duration),

    /// Driver or transport error from MongoDB.
    #[error("database error: {0}")]
    Database(#[from] mongodb::error::Error),

    /// Data in the store is corrupted or cannot be mapped.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

impl RepositoryError {
    /// Classify a driver error, turning duplicate key violations into
    /// [`RepositoryError::Conflict`].
    pub(crate) fn from_write(err: mongodb::error::Error) -> Self {
        if is_duplicate_key(&err) {
            return Self::Conflict("email already exists".to_owned());
        }
        Self::Database(err)
    }
}

/// A complete store: users, orders and a liveness check.
#[async_trait]
pub trait Store: UserStore + OrderStore {
    /// Check that the store answers.
    async fn ping(&self) -> Result<(), RepositoryError>;
}

/// MongoDB-backed store.
///
/// Cheap to clone; the driver pools connections internally.
#[derive(Debug, Clone)]
pub struct MongoStore {
    database: Database,
    pub(crate) users: Collection<UserDocument>,
    pub(crate) orders: Collection<Order>,
}

impl MongoStore {
    /// Wrap an existing database handle.
    #[must_use]
    pub fn new(database: Database) -> Self {
        Self {
            users: database.collection(USERS_COLLECTION),
            orders: database.collection(ORDERS_COLLECTION),
            database,
        }
    }

    /// Connect to MongoDB, verify the connection and ensure indexes.
    ///
    /// The database is `database` if given, else the one named in the URI,
    /// else [`DEFAULT_DATABASE`].
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the connection string is
    /// invalid or the server cannot be reached within `timeout`. A failed
    /// index build is logged and does not fail the connection.
    pub async fn connect(
        uri: &SecretString,
        database: Option<&str>,
        timeout: Duration,
    ) -> Result<Self, RepositoryError> {
        let mut options = ClientOptions::parse(uri.expose_secret()).await?;
        options.app_name = Some("bazaar-api".to_owned());
        options.server_selection_timeout = Some(timeout);
        options.connect_timeout = Some(timeout);

        let name = database
            .map(str::to_owned)
            .or_else(|| options.default_database.clone())
            .unwrap_or_else(|| DEFAULT_DATABASE.to_owned());

        let client = Client::with_options(options)?;
        let store = Self::new(client.database(&name));

        store.ping().await?;

        // Reachable but unindexable (e.g. duplicate emails) still serves;
        // `bazaar-cli indexes` retries once the data is fixed.
        if let Err(e) = store.ensure_indexes().await {
            tracing::error!(error = %e, database = %name, "Failed to create users.email index");
        }

        tracing::debug!(database = %name, "MongoDB store ready");
        Ok(store)
    }

    /// Create the unique index on `users.email`.
    ///
    /// Idempotent: creating an identical existing index is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the index cannot be created,
    /// for example because duplicate emails already exist.
    pub async fn ensure_indexes(&self) -> Result<(), RepositoryError> {
        let options = IndexOptions::builder()
            .unique(true)
            .name(EMAIL_INDEX_NAME.to_owned())
            .build();
        let index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(options)
            .build();

        self.users.create_index(index).await?;
        Ok(())
    }

    /// Name of the underlying database.
    #[must_use]
    pub fn database_name(&self) -> &str {
        self.database.name()
    }
}

#[async_trait]
impl Store for MongoStore {
    async fn ping(&self) -> Result<(), RepositoryError> {
        self.database.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }
}

/// Check whether a driver error is a unique index violation.
///
/// Inserts report it as a write error, `findAndModify` as a command error.
fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write_error)) => {
            write_error.code == DUPLICATE_KEY_CODE
        }
        ErrorKind::Command(command_error) => command_error.code == DUPLICATE_KEY_CODE,
        _ => false,
    }
}
