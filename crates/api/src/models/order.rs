//! Order domain type.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Number, Value};

/// An order created on payment confirmation.
///
/// The body of `/api/confirm-payment` is stored as-is: every field is
/// optional and nothing is validated. Fields outside this schema are dropped.
/// Numbers are kept as sent, integer or not.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_address: Option<String>,
    /// Opaque item records; `null` reads as empty.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub items: Vec<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_amount: Option<f64>,
    /// Free-form date string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_date: Option<String>,
    /// Caller-supplied order number; not unique.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_id: Option<Number>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Vec<Value>>::deserialize(deserializer).map(Option::unwrap_or_default)
}
