//! Request and response types exchanged over the public HTTP API.
//!
//! Every body is JSON. Field names are part of the wire contract consumed by
//! browser clients and must not be renamed.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Todo items
// ---------------------------------------------------------------------------

/// A single persisted todo as returned by `GET /todos`.
///
/// `todo` holds the trimmed, HTML-escaped text exactly as it was stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    /// Store-assigned identifier; never reused.
    pub id: i64,
    /// Escaped todo text.
    pub todo: String,
}

/// Request body for `POST /todos`.
///
/// Unknown fields are ignored. A missing or non-string `todo` fails
/// deserialisation.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTodoRequest {
    pub todo: String,
}

/// Successful response body for `POST /todos`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTodoResponse {
    pub success: bool,
    /// Identifier assigned to the new todo.
    pub id: i64,
    /// Full list after the insert.
    pub todos: Vec<Todo>,
}

/// Successful response body for `DELETE /todos/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteTodoResponse {
    pub success: bool,
    /// Full list after the delete.
    pub todos: Vec<Todo>,
}

// ---------------------------------------------------------------------------
// Error response
// ---------------------------------------------------------------------------

/// Standard error response body returned on any non-2xx status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable description safe to expose to callers.
    pub error: String,
}

impl ErrorResponse {
    /// Construct an [`ErrorResponse`] from a message.
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
