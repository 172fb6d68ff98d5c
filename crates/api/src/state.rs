//! Application state shared across handlers.

use std::sync::Arc;

use crate::gateway::Gateway;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`.
#[derive(Clone, Debug)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

#[derive(Debug)]
struct AppStateInner {
    gateway: Gateway,
}

impl AppState {
    /// Create a new application state around the persistence gateway.
    #[must_use]
    pub fn new(gateway: Gateway) -> Self {
        Self {
            inner: Arc::new(AppStateInner { gateway }),
        }
    }

    /// Get a reference to the persistence gateway.
    #[must_use]
    pub fn gateway(&self) -> &Gateway {
        &self.inner.gateway
    }
}
