//! User persistence.
//!
//! [`UserStore`] is the port; the MongoDB implementation lives here, the
//! in-memory one in [`super::memory`].

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{self, Document, doc};
use mongodb::options::ReturnDocument;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use bazaar_core::UserId;

use super::{MongoStore, RepositoryError};
use crate::models::user::{NewUser, User, UserUpdate};

/// User record operations. Every method is a single store round trip.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Get a user by email.
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError>;

    /// Insert a new user and return it with its assigned ID.
    ///
    /// Returns `RepositoryError::Conflict` if the email is taken.
    async fn insert_user(&self, user: NewUser) -> Result<User, RepositoryError>;

    /// Overlay `update` onto the user matched by `email`.
    ///
    /// Returns the updated user, or `None` if no user has that email.
    /// Never creates a user.
    async fn update_user_by_email(
        &self,
        email: &str,
        update: UserUpdate,
    ) -> Result<Option<User>, RepositoryError>;

    /// Delete the user matched by `email`.
    ///
    /// Returns `true` if a user was removed.
    async fn delete_user_by_email(&self, email: &str) -> Result<bool, RepositoryError>;

    /// Get every user.
    async fn list_users(&self) -> Result<Vec<User>, RepositoryError>;
}

/// A user as stored in the `users` collection.
#[derive(Debug, Serialize, Deserialize)]
pub struct UserDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    #[serde(default)]
    pub name: String,
    pub email: String,
    #[serde(rename = "passwordHash", default)]
    pub password_hash: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub products: Option<Vec<Value>>,
}

impl From<NewUser> for UserDocument {
    fn from(user: NewUser) -> Self {
        Self {
            id: None,
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            location: None,
            products: None,
        }
    }
}

impl TryFrom<UserDocument> for User {
    type Error = RepositoryError;

    fn try_from(document: UserDocument) -> Result<Self, Self::Error> {
        let id = document.id.ok_or_else(|| {
            RepositoryError::DataCorruption(format!("user {} has no _id", document.email))
        })?;

        Ok(Self {
            id: UserId::new(id.to_hex()),
            name: document.name,
            email: document.email,
            password_hash: document.password_hash,
            location: document.location,
            products: document.products.unwrap_or_default(),
        })
    }
}

/// Build the `$set` document for an update.
fn set_document(update: UserUpdate) -> Result<Document, RepositoryError> {
    let mut set = Document::new();

    if let Some(name) = update.name {
        set.insert("name", name);
    }
    if let Some(email) = update.email {
        set.insert("email", email);
    }
    if let Some(password_hash) = update.password_hash {
        set.insert("passwordHash", password_hash);
    }
    if let Some(location) = update.location {
        set.insert("location", location);
    }
    if let Some(products) = update.products {
        let products = bson::to_bson(&products).map_err(|e| {
            RepositoryError::DataCorruption(format!("products cannot be stored: {e}"))
        })?;
        set.insert("products", products);
    }

    Ok(set)
}

#[async_trait]
impl UserStore for MongoStore {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        self.users
            .find_one(doc! { "email": email })
            .await?
            .map(User::try_from)
            .transpose()
    }

    async fn insert_user(&self, user: NewUser) -> Result<User, RepositoryError> {
        let mut document = UserDocument::from(user);

        let result = self
            .users
            .insert_one(&document)
            .await
            .map_err(RepositoryError::from_write)?;

        let id = result.inserted_id.as_object_id().ok_or_else(|| {
            RepositoryError::DataCorruption("inserted _id is not an ObjectId".to_owned())
        })?;
        document.id = Some(id);

        User::try_from(document)
    }

    async fn update_user_by_email(
        &self,
        email: &str,
        update: UserUpdate,
    ) -> Result<Option<User>, RepositoryError> {
        // MongoDB rejects an empty $set
        if update.is_empty() {
            return self.find_user_by_email(email).await;
        }

        let set = set_document(update)?;

        self.users
            .find_one_and_update(doc! { "email": email }, doc! { "$set": set })
            .return_document(ReturnDocument::After)
            .await
            .map_err(RepositoryError::from_write)?
            .map(User::try_from)
            .transpose()
    }

    async fn delete_user_by_email(&self, email: &str) -> Result<bool, RepositoryError> {
        let result = self.users.delete_one(doc! { "email": email }).await?;
        Ok(result.deleted_count > 0)
    }

    async fn list_users(&self) -> Result<Vec<User>, RepositoryError> {
        let documents: Vec<UserDocument> = self.users.find(doc! {}).await?.try_collect().await?;
        documents.into_iter().map(User::try_from).collect()
    }
}
