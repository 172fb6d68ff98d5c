//! Business services sitting between route handlers and the gateway.

pub mod auth;

pub use auth::{AuthError, AuthService};
