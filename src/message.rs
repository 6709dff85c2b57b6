//! Message protocol definitions
//!
//! JSON-based bidirectional message protocol using Serde's tagged enum
//! for type-safe serialization/deserialization.

use serde::{Deserialize, Serialize};

use crate::preferences::PreferencesPayload;

/// Client → Server message
///
/// All messages from client to server. Uses tagged enum with snake_case naming.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Look for a partner (tears down any current pairing first)
    FindPartner { preferences: PreferencesPayload },
    /// Send a chat message to the current partner
    SendMessage { message: String },
}

/// Server → Client message
///
/// All messages from server to client. Uses tagged enum with snake_case naming.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Number of connected clients changed
    UpdateUserCount { count: usize },
    /// A partner was found
    PartnerConnected {
        gender: String,
        species: String,
        kinks: String,
    },
    /// No partner yet; the client now waits in the pool
    NoMatch,
    /// The partner left or went looking for someone else
    PartnerDisconnected,
    /// Chat message from the partner
    ReceiveMessage { message: String },
}
