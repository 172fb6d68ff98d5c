//! User domain types.

use core::fmt;

use serde::Serialize;
use serde_json::Value;

use bazaar_core::UserId;

/// A registered user (domain type).
///
/// Implements `Debug` manually to redact the password hash.
#[derive(Clone, PartialEq)]
pub struct User {
    /// Store-assigned ID.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Email address (unique lookup key).
    pub email: String,
    /// Argon2id PHC string.
    pub password_hash: String,
    /// Vendor location, if the user sells anything.
    pub location: Option<String>,
    /// Vendor products (opaque records).
    pub products: Vec<Value>,
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password_hash", &"[REDACTED]")
            .field("location", &self.location)
            .field("products", &self.products)
            .finish()
    }
}

/// Data needed to insert a user.
#[derive(Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

impl fmt::Debug for NewUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewUser")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password_hash", &"[REDACTED]")
            .finish()
    }
}

/// Fields to overlay onto an existing user.
///
/// `None` leaves the stored value untouched.
#[derive(Clone, Default)]
pub struct UserUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub location: Option<String>,
    pub products: Option<Vec<Value>>,
}

impl UserUpdate {
    /// Returns `true` if the update would not change anything.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.password_hash.is_none()
            && self.location.is_none()
            && self.products.is_none()
    }

    /// Overlay this update onto a user in place.
    pub fn apply_to(&self, user: &mut User) {
        if let Some(name) = &self.name {
            user.name.clone_from(name);
        }
        if let Some(email) = &self.email {
            user.email.clone_from(email);
        }
        if let Some(hash) = &self.password_hash {
            user.password_hash.clone_from(hash);
        }
        if let Some(location) = &self.location {
            user.location = Some(location.clone());
        }
        if let Some(products) = &self.products {
            user.products.clone_from(products);
        }
    }
}

impl fmt::Debug for UserUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserUpdate")
            .field("name", &self.name)
            .field("email", &self.email)
            .field(
                "password_hash",
                &self.password_hash.as_ref().map(|_| "[REDACTED]"),
            )
            .field("location", &self.location)
            .field("products", &self.products)
            .finish()
    }
}

/// Public projection of a user returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserSummary {
    pub id: UserId,
    pub name: String,
    pub email: String,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}
