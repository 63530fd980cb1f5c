//! Client-facing rejection for the WebSocket routes.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// The request did not ask to upgrade to WebSocket.
///
/// Rendered as `426 Upgrade Required` advertising the protocol the route
/// speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Upgrade Required")]
pub struct UpgradeRequired;

impl IntoResponse for UpgradeRequired {
    fn into_response(self) -> Response {
        (
            StatusCode::UPGRADE_REQUIRED,
            [
                (header::UPGRADE, HeaderValue::from_static("websocket")),
                (header::CONNECTION, HeaderValue::from_static("Upgrade")),
            ],
            self.to_string(),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_response_shape() {
        let response = UpgradeRequired.into_response();
        assert_eq!(response.status(), StatusCode::UPGRADE_REQUIRED);
        assert_eq!(response.headers()[header::UPGRADE], "websocket");

        let body = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        assert_eq!(&body[..], b"Upgrade Required");
    }
}
