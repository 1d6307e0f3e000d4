//! Structured logging setup.
//!
//! # Telemetry invariants
//!
//! - Todo text is never written to any log field; only ids and counts are.
//! - Log level is configurable via `LOG_LEVEL` (default: `info`); `RUST_LOG`
//!   takes precedence when set.

pub mod init;

pub use init::init_telemetry;
