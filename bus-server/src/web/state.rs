//! Application state for the web layer.

use std::sync::Arc;

use crate::store::RouteStore;

/// Shared application state.
///
/// Holds no per-user data; every request carries its own selections.
#[derive(Clone)]
pub struct AppState {
    /// Route store; one session is opened per request
    pub store: Arc<dyn RouteStore>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(store: impl RouteStore + 'static) -> Self {
        Self {
            store: Arc::new(store),
        }
    }
}
