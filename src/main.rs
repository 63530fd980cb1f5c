//! session-gate
//!
//! Serves live seat availability to enrollment clients over WebSocket.
//!
//! ```text
//!   Client ──GET {ws_prefix}/{session}──▶ upgrade_guard ──▶ session_socket
//!                                           │                    ▲
//!                                           └─▶ 426 when not     │ snapshots
//!                                               an upgrade       │
//!                                                            SessionHub
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use session_gate::config::{load_config, ServerConfig};
use session_gate::http::HttpServer;
use session_gate::lifecycle::Shutdown;
use session_gate::observability::init_logging;

#[derive(Parser)]
#[command(name = "session-gate")]
#[command(about = "WebSocket gateway for live session seat updates", long_about = None)]
struct Cli {
    /// Path to a TOML config file; defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ServerConfig::default(),
    };

    init_logging(&config.observability)?;

    tracing::info!(
        config_file = ?cli.config,
        bind_address = %config.listener.bind_address,
        route_prefix = %config.websocket.route_prefix,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    let listener = TcpListener::bind(&config.listener.bind_address).await?;

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config);
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
