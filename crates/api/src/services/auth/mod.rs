//! Authentication service.
//!
//! Provides password registration and login. Passwords are stored only as
//! salted Argon2id hashes and checked with the `password-hash` verifier.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use crate::db::RepositoryError;
use crate::gateway::Gateway;
use crate::models::user::{NewUser, User};

/// Authentication service.
///
/// Handles user registration and login.
pub struct AuthService<'a> {
    gateway: &'a Gateway,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(gateway: &'a Gateway) -> Self {
        Self { gateway }
    }

    /// Register a new user with name, email and password.
    ///
    /// The existence check and the insert are separate round trips; two
    /// concurrent registrations can both pass the check, in which case the
    /// store's unique index rejects the second insert.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserAlreadyExists` if the email is already registered.
    /// Returns `AuthError::Repository` if the store fails.
    pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<User, AuthError> {
        if self.gateway.find_user_by_email(email).await?.is_some() {
            return Err(AuthError::UserAlreadyExists);
        }

        let password_hash = hash_password(password)?;

        let user = self
            .gateway
            .insert_user(NewUser {
                name: name.to_owned(),
                email: email.to_owned(),
                password_hash,
            })
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
                other => AuthError::Repository(other),
            })?;

        tracing::info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    /// Login with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the email/password is wrong.
    /// Returns `AuthError::Repository` if the store fails.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let user = self
            .gateway
            .find_user_by_email(email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &user.password_hash)?;

        Ok(user)
    }
}

/// Hash a password using Argon2id with a random salt.
///
/// # Errors
///
/// Returns `AuthError::PasswordHash` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}
