//! Shared application state injected into every Axum handler.

use std::sync::Arc;

use crate::store::{self, StoreError, TodoStore};

/// Application state shared across all request handlers.
///
/// Cloning is cheap: the only field is an `Arc` around the store handle,
/// which is opened once at startup and injected here.
#[derive(Clone)]
pub struct AppState {
    /// The todo store. Any [`TodoStore`] works, including test doubles.
    pub store: Arc<dyn TodoStore>,
}

impl AppState {
    /// Create a new [`AppState`] around an opened store.
    pub fn new(store: Arc<dyn TodoStore>) -> Self {
        Self { store }
    }

    /// Run a synchronous store operation without blocking the async workers.
    pub async fn with_store<T, F>(&self, op: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&dyn TodoStore) -> Result<T, StoreError> + Send + 'static,
    {
        store::run_blocking(self.store.clone(), op).await
    }
}
