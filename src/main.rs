//! Anonymous 1:1 Pairing Server - Entry Point
//!
//! Starts the TCP listener and PairingServer actor, accepting connections.

use clap::Parser;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use pairing_server::{handle_connection, PairingServer, ServerConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Use RUST_LOG env var to control log level
    // e.g., RUST_LOG=debug or RUST_LOG=pairing_server=trace
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("pairing_server=info")),
        )
        .init();

    let config = ServerConfig::parse();

    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("Pairing server is online and listening on {}", addr);

    let (cmd_tx, cmd_rx) = mpsc::channel(config.command_buffer);
    let server = PairingServer::new(cmd_rx, config.match_rules());
    tokio::spawn(server.run());

    // Connection accept loop
    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                info!("New connection from {}", addr);
                let cmd_tx = cmd_tx.clone();
                let client_buffer = config.client_buffer;

                tokio::spawn(async move {
                    if let Err(e) = handle_connection(stream, cmd_tx, client_buffer).await {
                        error!("Connection handler error: {}", e);
                    }
                });
            }
            Err(e) => {
                error!("Failed to accept connection: {}", e);
            }
        }
    }
}
