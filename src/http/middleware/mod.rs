//! Request middleware applied to route groups.

pub mod upgrade_guard;

pub use upgrade_guard::{guard_request, upgrade_guard, UpgradeContext};
