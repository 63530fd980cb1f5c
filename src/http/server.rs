//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Guard the session socket route with the upgrade middleware
//! - Wire up cross-cutting layers (request ID, tracing, timeout)
//! - Serve until shutdown, then close open sockets

use axum::{
    middleware,
    routing::{any, get},
    Router,
};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ServerConfig;
use crate::http::middleware::upgrade_guard;
use crate::http::websocket::session_socket;
use crate::lifecycle::{wait_for_signal, Shutdown};
use crate::sessions::SessionHub;

const PRUNE_INTERVAL: Duration = Duration::from_secs(60);

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub hub: SessionHub,
    /// Fired once the server stops accepting; open sockets close on it.
    pub closing: Shutdown,
}

/// HTTP server hosting the guarded session sockets.
pub struct HttpServer {
    router: Router,
    config: ServerConfig,
    state: AppState,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ServerConfig) -> Self {
        let state = AppState {
            hub: SessionHub::new(config.websocket.channel_capacity),
            closing: Shutdown::new(),
        };

        let router = Self::build_router(&config, state.clone());
        Self {
            router,
            config,
            state,
        }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ServerConfig, state: AppState) -> Router {
        let socket_path = format!("{}/{{session}}", config.websocket.route_prefix);

        let sockets = Router::new()
            .route(&socket_path, any(session_socket))
            .route_layer(middleware::from_fn(upgrade_guard));

        Router::new()
            .route("/health", get(health))
            .merge(sockets)
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            route_prefix = %self.config.websocket.route_prefix,
            "HTTP server starting"
        );

        let hub = self.state.hub.clone();
        let mut prune_stop = self.state.closing.subscribe();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(PRUNE_INTERVAL);
            loop {
                tokio::select! {
                    _ = ticker.tick() => hub.prune(),
                    _ = prune_stop.recv() => break,
                }
            }
        });

        let closing = self.state.closing.clone();
        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                wait_for_signal(shutdown).await;
                closing.trigger();
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Hub used to publish seat snapshots to connected sockets.
    pub fn hub(&self) -> SessionHub {
        self.state.hub.clone()
    }
}

async fn health() -> &'static str {
    "ok"
}
