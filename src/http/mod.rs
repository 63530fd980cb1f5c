//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, tracing, timeout)
//!     → middleware/upgrade_guard.rs (426 unless the request asks for WebSocket)
//!     → websocket.rs (handshake, stream session snapshots)
//! ```

pub mod error;
pub mod middleware;
pub mod server;
pub mod upgrade;
pub mod websocket;

pub use error::UpgradeRequired;
pub use middleware::{guard_request, upgrade_guard, UpgradeContext};
pub use server::{AppState, HttpServer};
pub use upgrade::is_websocket_upgrade;
