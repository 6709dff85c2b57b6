//! Anonymous 1:1 WebSocket Pairing Server Library
//!
//! Clients describe themselves and who they want to meet; the server pairs
//! compatible clients into private two-person chats and relays messages
//! between partners until one of them leaves or looks for someone new.
//!
//! # Features
//! - WebSocket connection handling
//! - Online user count broadcast
//! - Preference-based pairing with a FIFO waiting pool
//! - Markup-stripped message relay
//! - Partner disconnect notification
//!
//! # Architecture
//! Uses the Actor pattern with `mpsc` channels:
//! - `PairingServer` is the central actor owning the `PairingEngine`
//! - Each connection has a `handler` task communicating with the server
//! - No locks needed - all state access goes through message passing
//!
//! # Example
//! ```ignore
//! use tokio::net::TcpListener;
//! use tokio::sync::mpsc;
//! use pairing_server::{handle_connection, MatchRules, PairingServer};
//!
//! #[tokio::main]
//! async fn main() {
//!     let listener = TcpListener::bind("127.0.0.1:3000").await.unwrap();
//!     let (cmd_tx, cmd_rx) = mpsc::channel(256);
//!
//!     tokio::spawn(PairingServer::new(cmd_rx, MatchRules::default()).run());
//!
//!     while let Ok((stream, _)) = listener.accept().await {
//!         let cmd_tx = cmd_tx.clone();
//!         tokio::spawn(handle_connection(stream, cmd_tx, 32));
//!     }
//! }
//! ```

pub mod client;
pub mod compatibility;
pub mod config;
pub mod engine;
pub mod error;
pub mod handler;
pub mod lifecycle;
pub mod message;
pub mod pool;
pub mod preferences;
pub mod registry;
pub mod relay;
pub mod server;
pub mod types;

// Re-export main types for convenience
pub use client::{Client, Partner};
pub use compatibility::MatchRules;
pub use config::ServerConfig;
pub use engine::{EngineSnapshot, PairingEngine};
pub use error::{AppError, PreferencesError, SendError};
pub use handler::handle_connection;
pub use message::{ClientMessage, ServerMessage};
pub use pool::{WaitingEntry, WaitingPool};
pub use preferences::{Preferences, PreferencesPayload, RawPreferences, Selection};
pub use registry::ConnectionRegistry;
pub use relay::{Sanitizer, StripTags};
pub use server::{PairingServer, ServerCommand};
pub use types::ClientId;
