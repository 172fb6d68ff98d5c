//! Domain models for the API.
//!
//! These types are independent of the store representation; the `db`
//! module maps them to and from MongoDB documents.

pub mod order;
pub mod user;
pub mod vendor;

pub use order::Order;
pub use user::{NewUser, User, UserSummary, UserUpdate};
pub use vendor::{DEFAULT_VENDOR_IMAGE, VendorView};
