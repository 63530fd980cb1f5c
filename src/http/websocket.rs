//! Session socket handling.
//!
//! # Responsibilities
//! - Refuse requests the upgrade guard did not mark as allowed
//! - Complete the upgrade handshake with the client
//! - Stream seat snapshots of the requested session as JSON text frames
//!
//! # Data Flow
//! ```text
//! SessionHub ──broadcast──▶ socket task ──text frames──▶ Client
//! ```
//!
//! # Design Decisions
//! - Subscription happens before the 101 response, so nothing published
//!   after the handshake is missed
//! - Inbound frames other than Close are ignored
//! - A lagging socket skips snapshots instead of slowing publishers

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Path, State,
    },
    response::Response,
    Extension,
};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::broadcast::{self, error::RecvError};

use crate::http::error::UpgradeRequired;
use crate::http::middleware::UpgradeContext;
use crate::http::server::AppState;
use crate::sessions::SeatSnapshot;

/// `ANY {ws_prefix}/{session}`: upgrade and stream the session's seat updates.
pub async fn session_socket(
    State(state): State<AppState>,
    Path(session): Path<String>,
    Extension(context): Extension<UpgradeContext>,
    ws: WebSocketUpgrade,
) -> Result<Response, UpgradeRequired> {
    if !context.allowed {
        return Err(UpgradeRequired);
    }

    let updates = state.hub.subscribe(&session);
    let closing = state.closing.subscribe();

    Ok(ws.on_upgrade(move |socket| stream_snapshots(socket, session, updates, closing)))
}

/// What to do with one result from the session's broadcast channel.
#[derive(Debug, PartialEq)]
enum Outbound {
    Send(Message),
    Skip,
    Stop,
}

fn outbound(session: &str, update: Result<SeatSnapshot, RecvError>) -> Outbound {
    match update {
        Ok(snapshot) => match serde_json::to_string(&snapshot) {
            Ok(payload) => Outbound::Send(Message::Text(payload.into())),
            Err(error) => {
                tracing::warn!(session = %session, %error, "Failed to encode seat snapshot");
                Outbound::Skip
            }
        },
        Err(RecvError::Lagged(skipped)) => {
            tracing::warn!(session = %session, skipped, "Session socket lagging");
            Outbound::Skip
        }
        Err(RecvError::Closed) => Outbound::Stop,
    }
}

async fn stream_snapshots(
    socket: WebSocket,
    session: String,
    mut updates: broadcast::Receiver<SeatSnapshot>,
    mut closing: broadcast::Receiver<()>,
) {
    tracing::info!(session = %session, "Session socket opened");
    let (mut sender, mut receiver) = socket.split();

    loop {
        tokio::select! {
            update = updates.recv() => match outbound(&session, update) {
                Outbound::Send(message) => {
                    if sender.send(message).await.is_err() {
                        break;
                    }
                }
                Outbound::Skip => {}
                Outbound::Stop => break,
            },
            inbound = receiver.next() => match inbound {
                Some(Ok(Message::Close(_))) => {
                    // Flushes the close reply queued by the protocol layer.
                    let _ = sender.send(Message::Close(None)).await;
                    break;
                }
                None => break,
                Some(Ok(_)) => {}
                Some(Err(error)) => {
                    tracing::debug!(session = %session, %error, "Session socket error");
                    break;
                }
            },
            _ = closing.recv() => {
                let _ = sender.send(Message::Close(None)).await;
                break;
            }
        }
    }

    tracing::debug!(session = %session, "Session socket closed");
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
        middleware::{self, Next},
        routing::any,
        Router,
    };
    use tokio_tungstenite::tungstenite;
    use tower::ServiceExt;

    use crate::lifecycle::Shutdown;
    use crate::sessions::SessionHub;

    fn state() -> AppState {
        AppState {
            hub: SessionHub::default(),
            closing: Shutdown::new(),
        }
    }

    fn handshake_request() -> Request<Body> {
        Request::get("/ws/fall")
            .header(header::CONNECTION, "Upgrade")
            .header(header::UPGRADE, "websocket")
            .header(header::SEC_WEBSOCKET_VERSION, "13")
            .header(header::SEC_WEBSOCKET_KEY, "dGhlIHNhbXBsZSBub25jZQ==")
            .body(Body::empty())
            .unwrap()
    }

    async fn deny_upgrade(mut request: Request<Body>, next: Next) -> axum::response::Response {
        request.extensions_mut().insert(UpgradeContext { allowed: false });
        next.run(request).await
    }

    #[test]
    fn test_snapshot_becomes_text_frame() {
        let seats = SeatSnapshot::from([("CS101".to_string(), 12)]);
        assert_eq!(
            outbound("fall", Ok(seats)),
            Outbound::Send(Message::Text(r#"{"CS101":12}"#.into()))
        );
    }

    #[test]
    fn test_lagged_socket_skips() {
        assert_eq!(outbound("fall", Err(RecvError::Lagged(3))), Outbound::Skip);
        assert_eq!(outbound("fall", Err(RecvError::Closed)), Outbound::Stop);
    }

    #[tokio::test]
    async fn test_lagged_receiver_resumes_with_latest_snapshot() {
        let hub = SessionHub::new(1);
        let mut updates = hub.subscribe("fall");

        hub.publish("fall", SeatSnapshot::from([("CS101".to_string(), 2)]));
        hub.publish("fall", SeatSnapshot::from([("CS101".to_string(), 1)]));

        assert_eq!(outbound("fall", updates.recv().await), Outbound::Skip);
        assert_eq!(
            outbound("fall", updates.recv().await),
            Outbound::Send(Message::Text(r#"{"CS101":1}"#.into()))
        );
    }

    #[tokio::test]
    async fn test_unguarded_route_fails_closed() {
        let app = Router::new()
            .route("/ws/{session}", any(session_socket))
            .with_state(state());

        let response = app.oneshot(handshake_request()).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_disallowed_context_is_refused() {
        let state = state();
        let hub = state.hub.clone();
        let app = Router::new()
            .route("/ws/{session}", any(session_socket))
            .route_layer(middleware::from_fn(deny_upgrade))
            .with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        let err = tokio_tungstenite::connect_async(format!("ws://{addr}/ws/fall"))
            .await
            .unwrap_err();
        match err {
            tungstenite::Error::Http(response) => {
                assert_eq!(response.status(), StatusCode::UPGRADE_REQUIRED);
                assert_eq!(response.headers()[header::UPGRADE], "websocket");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(hub.subscriber_count("fall"), 0);
    }
}
