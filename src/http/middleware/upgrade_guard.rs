//! Upgrade guard middleware.
//! Only lets WebSocket upgrade requests through to the socket handlers.

use axum::{body::Body, http::Request, middleware::Next, response::Response};

use crate::http::error::UpgradeRequired;
use crate::http::upgrade::is_websocket_upgrade;

/// Context attached to requests that passed the guard.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UpgradeContext {
    pub allowed: bool,
}

/// Marks the request as allowed if it is a WebSocket upgrade.
///
/// On rejection the request is left untouched. Running it again on the same
/// request gives the same answer.
pub fn guard_request<B>(req: &mut Request<B>) -> Result<(), UpgradeRequired> {
    if !is_websocket_upgrade(req.headers()) {
        return Err(UpgradeRequired);
    }

    req.extensions_mut().insert(UpgradeContext { allowed: true });
    Ok(())
}

pub async fn upgrade_guard(
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, UpgradeRequired> {
    if let Err(rejection) = guard_request(&mut request) {
        tracing::debug!(
            method = %request.method(),
            path = %request.uri().path(),
            "Rejected non-upgrade request"
        );
        return Err(rejection);
    }

    Ok(next.run(request).await)
}
