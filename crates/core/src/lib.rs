//! Bazaar Core - Shared types library.
//!
//! This crate provides common types used across all Bazaar components:
//! - `api` - JSON REST backend (users, vendors, orders)
//! - `cli` - Command-line tools for indexes and record listings
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for opaque store IDs and vendor ratings

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
