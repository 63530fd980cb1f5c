//! Configuration validation.
//!
//! Serde handles the syntax; this module checks value ranges and formats.
//! All errors are collected so a bad file is reported in one pass.

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::ServerConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address {0:?} is not a socket address")]
    BindAddress(String),

    #[error("timeouts.request_secs must be greater than zero")]
    ZeroRequestTimeout,

    #[error("websocket.route_prefix {0:?} must start with '/', not end with '/', and contain no braces")]
    RoutePrefix(String),

    #[error("websocket.channel_capacity must be greater than zero")]
    ZeroChannelCapacity,

    #[error("observability.log_level {0:?} is not one of trace, debug, info, warn, error")]
    LogLevel(String),
}

/// Validate a parsed configuration, returning every error found.
pub fn validate_config(config: &ServerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(config.listener.bind_address.clone()));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroRequestTimeout);
    }

    let prefix = &config.websocket.route_prefix;
    if !prefix.starts_with('/') || prefix.ends_with('/') || prefix.contains(['{', '}']) {
        errors.push(ValidationError::RoutePrefix(prefix.clone()));
    }

    if config.websocket.channel_capacity == 0 {
        errors.push(ValidationError::ZeroChannelCapacity);
    }

    let level = config.observability.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::LogLevel(config.observability.log_level.clone()));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
