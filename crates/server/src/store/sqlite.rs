//! [`SqliteTodoStore`]: the file-backed [`TodoStore`].

use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use common::protocol::Todo;
use rusqlite::{params, Connection};

use super::{StoreError, TodoStore};

const CREATE_TABLE_SQL: &str = "
    CREATE TABLE IF NOT EXISTS todos (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        todo TEXT NOT NULL,
        created_at DATETIME DEFAULT CURRENT_TIMESTAMP
    )
";

const LIST_SQL: &str = "SELECT id, todo FROM todos ORDER BY id";
const INSERT_SQL: &str = "INSERT INTO todos (todo) VALUES (?1)";
const DELETE_SQL: &str = "DELETE FROM todos WHERE id = ?1";

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// SQLite-backed todo store.
///
/// A single [`Connection`] is shared behind a [`Mutex`]; statements are
/// prepared once and reused from the connection's statement cache.
#[derive(Debug)]
pub struct SqliteTodoStore {
    conn: Mutex<Connection>,
}

impl SqliteTodoStore {
    /// Open (or create) the database at `path` and ensure the schema exists.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Sqlite`] if the file cannot be opened or the
    /// table cannot be created.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        Self::from_connection(Connection::open(path)?)
    }

    /// Open a private in-memory database. Contents vanish with the store.
    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.busy_timeout(BUSY_TIMEOUT)?;
        conn.execute_batch(CREATE_TABLE_SQL)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Close the underlying connection, flushing any pending state.
    ///
    /// # Errors
    ///
    /// Returns an error if the lock was poisoned or SQLite refuses to close.
    pub fn close(self) -> Result<(), StoreError> {
        let conn = self.conn.into_inner().map_err(|_| StoreError::Poisoned)?;
        conn.close().map_err(|(_, e)| StoreError::Sqlite(e))
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::Poisoned)
    }
}

impl TodoStore for SqliteTodoStore {
    fn list(&self) -> Result<Vec<Todo>, StoreError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare_cached(LIST_SQL)?;
        let rows = stmt.query_map([], |row| {
            Ok(Todo {
                id: row.get(0)?,
                todo: row.get(1)?,
            })
        })?;
        let todos = rows.collect::<Result<Vec<_>, _>>()?;
        Ok(todos)
    }

    fn insert(&self, text: &str) -> Result<i64, StoreError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare_cached(INSERT_SQL)?;
        let id = stmt.insert(params![text])?;
        Ok(id)
    }

    fn delete(&self, id: i64) -> Result<usize, StoreError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare_cached(DELETE_SQL)?;
        let removed = stmt.execute(params![id])?;
        Ok(removed)
    }
}
