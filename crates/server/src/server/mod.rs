//! Axum HTTP server, routing, and middleware.
//!
//! # Responsibilities
//! - Define the Axum router with all routes and shared middleware.
//! - Read request bodies under a byte cap.
//! - Inject shared application state (`AppState`) into handlers.

pub mod body;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;
