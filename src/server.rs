//! PairingServer Actor implementation
//!
//! The central actor that owns the `PairingEngine`. Handlers never touch
//! pairing state directly: every connection event becomes a `ServerCommand`
//! and commands are applied one at a time, each running to completion.

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

use crate::compatibility::MatchRules;
use crate::engine::{EngineSnapshot, PairingEngine};
use crate::message::ServerMessage;
use crate::preferences::PreferencesPayload;
use crate::types::ClientId;

/// Commands sent from handlers to the PairingServer actor
#[derive(Debug)]
pub enum ServerCommand {
    /// New client connected
    Connect {
        client_id: ClientId,
        sender: mpsc::Sender<ServerMessage>,
    },
    /// Client disconnected
    Disconnect { client_id: ClientId },
    /// Client is looking for a partner
    FindPartner {
        client_id: ClientId,
        preferences: PreferencesPayload,
    },
    /// Client sent a chat message
    SendMessage { client_id: ClientId, message: String },
    /// Report the current pairing state
    Snapshot { reply: oneshot::Sender<EngineSnapshot> },
}

/// The main PairingServer actor
///
/// Manages all state and processes commands from client handlers.
pub struct PairingServer {
    engine: PairingEngine,
    /// Command receiver channel
    receiver: mpsc::Receiver<ServerCommand>,
}

impl PairingServer {
    /// Create a new PairingServer with the given command receiver
    pub fn new(receiver: mpsc::Receiver<ServerCommand>, rules: MatchRules) -> Self {
        Self::with_engine(receiver, PairingEngine::new(rules))
    }

    /// Create a PairingServer around an existing engine
    pub fn with_engine(receiver: mpsc::Receiver<ServerCommand>, engine: PairingEngine) -> Self {
        Self { engine, receiver }
    }

    /// Run the PairingServer event loop
    ///
    /// Continuously receives and processes commands until all senders are dropped.
    pub async fn run(mut self) {
        info!(
            "PairingServer started (min kink overlap {})",
            self.engine.rules().min_kink_overlap
        );

        while let Some(cmd) = self.receiver.recv().await {
            self.handle_command(cmd);
        }

        info!("PairingServer shutting down");
    }

    /// Process a single command
    fn handle_command(&mut self, cmd: ServerCommand) {
        match cmd {
            ServerCommand::Connect { client_id, sender } => {
                self.engine.connect(client_id, sender);
            }
            ServerCommand::Disconnect { client_id } => {
                self.engine.disconnect(client_id);
            }
            ServerCommand::FindPartner {
                client_id,
                preferences,
            } => {
                self.engine.find_partner(client_id, preferences);
            }
            ServerCommand::SendMessage { client_id, message } => {
                self.engine.relay(client_id, &message);
            }
            ServerCommand::Snapshot { reply } => {
                let _ = reply.send(self.engine.snapshot());
            }
        }

        debug!(
            "Total clients: {}, Waiting: {}",
            self.engine.users_online(),
            self.engine.waiting_count()
        );
    }
}
