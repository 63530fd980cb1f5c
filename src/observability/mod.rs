//! Observability subsystem.
//!
//! # Design Decisions
//! - Structured logging via `tracing`, JSON optional for machine parsing
//! - Request ID set on every request and echoed on the response

pub mod logging;

pub use logging::init_logging;
