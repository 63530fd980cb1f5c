//! WebSocket upgrade guard and session seat-update server.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod sessions;

pub use config::ServerConfig;
pub use http::{upgrade_guard, HttpServer, UpgradeContext, UpgradeRequired};
pub use lifecycle::Shutdown;
pub use sessions::{SeatSnapshot, SessionHub};
