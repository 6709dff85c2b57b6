//! Client struct definition
//!
//! Represents a connected client: its outbound channel and, while paired,
//! a link to its partner.

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use crate::error::SendError;
use crate::message::ServerMessage;
use crate::preferences::Preferences;
use crate::types::ClientId;

/// The other side of a pairing as seen from one client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partner {
    pub id: ClientId,
    pub preferences: Preferences,
}

/// Connected client information
///
/// `partner` is only ever set or cleared by the pairing engine, and always
/// on both sides of the pairing together.
#[derive(Debug)]
pub struct Client {
    /// Unique identifier for this client
    pub id: ClientId,
    /// Server → Client message channel
    pub sender: mpsc::Sender<ServerMessage>,
    /// Current partner (None while idle or waiting)
    pub partner: Option<Partner>,
}

impl Client {
    /// Create a new, unpaired client with the given ID and sender channel
    pub fn new(id: ClientId, sender: mpsc::Sender<ServerMessage>) -> Self {
        Self {
            id,
            sender,
            partner: None,
        }
    }

    /// Queue a message for this client without waiting
    ///
    /// Returns an error if the channel is closed (client disconnected)
    /// or full (client not keeping up).
    pub fn send(&self, msg: ServerMessage) -> Result<(), SendError> {
        self.sender.try_send(msg).map_err(|e| match e {
            TrySendError::Closed(_) => SendError::ChannelClosed,
            TrySendError::Full(_) => SendError::ChannelFull,
        })
    }

    /// Queue a message that may be skipped when the client falls behind
    ///
    /// Leaves a quarter of the channel free so pairing and chat messages
    /// still fit after a burst of these.
    pub fn send_lossy(&self, msg: ServerMessage) -> Result<(), SendError> {
        let reserve = self.sender.max_capacity() / 4;
        if self.sender.capacity() <= reserve {
            return Err(SendError::ChannelFull);
        }
        self.send(msg)
    }

    /// Check whether the client's write task is still running
    pub fn is_live(&self) -> bool {
        !self.sender.is_closed()
    }

    /// Get the partner's ClientId, if paired
    pub fn partner_id(&self) -> Option<ClientId> {
        self.partner.as_ref().map(|p| p.id)
    }

    /// Check if this client is currently paired
    pub fn is_paired(&self) -> bool {
        self.partner.is_some()
    }
}
