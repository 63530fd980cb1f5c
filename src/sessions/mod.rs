//! Live session state pushed to connected sockets.
//!
//! # Data Flow
//! ```text
//! enrollment update
//!     → SessionHub::publish(session, snapshot)
//!     → broadcast channel for that session
//!     → every socket subscribed on {ws_prefix}/{session}
//! ```
//!
//! # Design Decisions
//! - One channel per session, created lazily on first subscriber
//! - Slow sockets lag and skip; publishers never wait

pub mod hub;

pub use hub::{SeatSnapshot, SessionHub};
