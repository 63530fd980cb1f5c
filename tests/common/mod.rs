//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::time::Duration;

use session_gate::config::ServerConfig;
use session_gate::http::HttpServer;
use session_gate::lifecycle::Shutdown;
use session_gate::sessions::{SeatSnapshot, SessionHub};

/// A server running on an ephemeral port.
pub struct TestServer {
    pub addr: SocketAddr,
    pub hub: SessionHub,
    pub shutdown: Shutdown,
}

impl TestServer {
    pub fn ws_url(&self, session: &str) -> String {
        format!("ws://{}/session/ws/{}", self.addr, session)
    }

    pub fn http_url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

/// Start a server with default settings on `127.0.0.1:0`.
pub async fn start_server() -> TestServer {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = HttpServer::new(ServerConfig::default());
    let hub = server.hub();
    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    TestServer { addr, hub, shutdown }
}

/// Wait until at least `count` sockets are subscribed to `session`.
pub async fn wait_for_subscribers(hub: &SessionHub, session: &str, count: usize) {
    for _ in 0..100 {
        if hub.subscriber_count(session) >= count {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("session {session} never reached {count} subscribers");
}

pub fn snapshot(pairs: &[(&str, u32)]) -> SeatSnapshot {
    pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}
