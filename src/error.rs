//! Error types for the pairing server
//!
//! Defines connection-level errors, message delivery errors and
//! preference validation errors. Uses thiserror for ergonomic error definitions.

use thiserror::Error;

/// Application-level errors
///
/// All of these end the affected connection only; nothing here is
/// fatal to the server as a whole.
#[derive(Debug, Error)]
pub enum AppError {
    /// WebSocket protocol error (fatal)
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    /// Channel send error (fatal - internal channel broken)
    #[error("Channel send error")]
    ChannelSend,
}

/// Message send errors
///
/// Occurs when a message cannot be queued for a client's write task.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SendError {
    /// The receiving end of the channel has been closed
    #[error("Channel closed")]
    ChannelClosed,

    /// The client is not draining its channel fast enough
    #[error("Channel full")]
    ChannelFull,
}

/// Reasons a preferences record is rejected
///
/// Never reported to the client: an invalid seek is a silent no-op.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PreferencesError {
    /// A required field was absent from the payload
    #[error("missing field: {0}")]
    Missing(&'static str),

    /// A required field was present but blank
    #[error("empty field: {0}")]
    Empty(&'static str),
}
