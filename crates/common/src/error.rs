//! Common error types shared across crates.

use thiserror::Error;

/// Message returned to callers for any storage failure.
pub const DATABASE_ERROR_MESSAGE: &str = "Database error";

/// Top-level service error type.
///
/// Variants map to HTTP status codes returned to callers:
/// - [`ServiceError::Validation`] → 400
/// - [`ServiceError::PayloadTooLarge`] → 413
/// - [`ServiceError::NotFound`] → 404
/// - [`ServiceError::Timeout`] → 408
/// - [`ServiceError::Store`] → 500
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The request was malformed: bad JSON, a missing or oversized todo, a bad id.
    /// The message is safe to return to the caller verbatim.
    #[error("bad request: {0}")]
    Validation(String),

    /// The request body exceeded the configured byte cap.
    #[error("payload too large: limit is {limit} bytes")]
    PayloadTooLarge { limit: usize },

    /// Neither the route nor the referenced todo exists.
    #[error("not found: {0}")]
    NotFound(String),

    /// The request did not complete within the per-request deadline.
    #[error("request timed out")]
    Timeout,

    /// The underlying storage failed. The detail is for logs only.
    #[error("store error: {0}")]
    Store(String),
}

impl ServiceError {
    /// Returns the HTTP status code that should be sent for this error.
    pub fn http_status(&self) -> u16 {
        match self {
            ServiceError::Validation(_) => 400,
            ServiceError::PayloadTooLarge { .. } => 413,
            ServiceError::NotFound(_) => 404,
            ServiceError::Timeout => 408,
            ServiceError::Store(_) => 500,
        }
    }

    /// Returns the message placed in the `{"error": ...}` response body.
    ///
    /// Storage details are never exposed; callers only see
    /// [`DATABASE_ERROR_MESSAGE`].
    pub fn client_message(&self) -> &str {
        match self {
            ServiceError::Validation(m) | ServiceError::NotFound(m) => m,
            ServiceError::PayloadTooLarge { .. } => "Payload too large",
            ServiceError::Timeout => "Request timeout",
            ServiceError::Store(_) => DATABASE_ERROR_MESSAGE,
        }
    }
}
