//! WebSocket upgrade detection.
//!
//! Only the intent to upgrade is checked here (`Connection: upgrade` plus
//! `Upgrade: websocket`). Key, version and method are validated later by the
//! handshake itself.

use axum::http::{header, HeaderMap, HeaderName};

/// Returns true when the headers ask to switch the connection to WebSocket.
pub fn is_websocket_upgrade(headers: &HeaderMap) -> bool {
    header_has_token(headers, header::CONNECTION, "upgrade")
        && header_has_token(headers, header::UPGRADE, "websocket")
}

/// Checks every line of a comma-separated header for `token`, ignoring ASCII case.
fn header_has_token(headers: &HeaderMap, name: HeaderName, token: &str) -> bool {
    headers
        .get_all(name)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .any(|item| item.trim().eq_ignore_ascii_case(token))
}
