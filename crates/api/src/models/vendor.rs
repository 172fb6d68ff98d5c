//! Vendor view: a read-only projection of a user.

use serde::Serialize;
use serde_json::Value;

use bazaar_core::{Rating, UserId};

use super::User;

/// Image shown for every vendor.
pub const DEFAULT_VENDOR_IMAGE: &str = "/images/default-vendor.png";

/// A user presented as a vendor.
///
/// The rating is synthesized by the caller for every response and is never
/// stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VendorView {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub location: Option<String>,
    pub products: Vec<Value>,
    pub rating: Rating,
    pub image: &'static str,
}

impl VendorView {
    /// Project a user into a vendor view with the given rating.
    #[must_use]
    pub fn from_user(user: User, rating: Rating) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            location: user.location,
            products: user.products,
            rating,
            image: DEFAULT_VENDOR_IMAGE,
        }
    }
}
