//! Todo persistence: the [`TodoStore`] seam and its SQLite implementation.
//!
//! # Lifecycle
//!
//! 1. At startup, [`SqliteTodoStore::open`] opens (or creates) the database
//!    file and installs the `todos` table if it is absent.
//! 2. The store is shared with every handler behind an `Arc<dyn TodoStore>`.
//! 3. Handlers call into the store through [`run_blocking`], which moves the
//!    synchronous SQLite work onto Tokio's blocking pool.
//! 4. On shutdown the last handle is closed via [`SqliteTodoStore::close`].
//!
//! Every statement is parameterised; todo text is never spliced into SQL.

pub mod sqlite;

pub use sqlite::SqliteTodoStore;

use std::sync::Arc;

use common::protocol::Todo;
use common::ServiceError;
use thiserror::Error;

/// Errors produced by the storage layer.
#[derive(Debug, Error)]
pub enum StoreError {
    /// SQLite rejected or failed to execute a statement.
    #[error("sqlite: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// A thread panicked while holding the connection lock.
    #[error("store connection lock poisoned")]
    Poisoned,

    /// The blocking task running a store operation was cancelled or panicked.
    #[error("store task failed: {0}")]
    Task(String),
}

impl From<StoreError> for ServiceError {
    fn from(e: StoreError) -> Self {
        ServiceError::Store(e.to_string())
    }
}

/// Data-access operations over the single `todos` table.
///
/// Each operation is one statement and therefore atomic at the storage layer;
/// implementations need no locking beyond what protects their handle.
#[cfg_attr(test, mockall::automock)]
pub trait TodoStore: Send + Sync {
    /// All todos in ascending `id` order.
    fn list(&self) -> Result<Vec<Todo>, StoreError>;

    /// Insert already-sanitised text and return the newly assigned id.
    fn insert(&self, text: &str) -> Result<i64, StoreError>;

    /// Delete by id, returning the number of rows removed (0 or 1).
    fn delete(&self, id: i64) -> Result<usize, StoreError>;
}

/// Run `op` against `store` on the blocking thread pool.
///
/// # Errors
///
/// Returns whatever `op` returns, or [`StoreError::Task`] if the blocking task
/// could not complete.
pub async fn run_blocking<T, F>(store: Arc<dyn TodoStore>, op: F) -> Result<T, StoreError>
where
    T: Send + 'static,
    F: FnOnce(&dyn TodoStore) -> Result<T, StoreError> + Send + 'static,
{
    tokio::task::spawn_blocking(move || op(store.as_ref()))
        .await
        .map_err(|e| StoreError::Task(e.to_string()))?
}
