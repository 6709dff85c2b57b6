//! Message relay between partners
//!
//! Messages are stripped of markup before they reach the partner.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::engine::PairingEngine;
use crate::message::ServerMessage;
use crate::types::ClientId;

static TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"</?[^<>]*>").expect("tag pattern is valid"));

/// Transforms a raw chat message before it is relayed
pub trait Sanitizer: Send {
    fn sanitize(&self, raw: &str) -> String;
}

/// Removes every `<tag>` and `</tag>` from a message
#[derive(Debug, Clone, Copy, Default)]
pub struct StripTags;

impl Sanitizer for StripTags {
    fn sanitize(&self, raw: &str) -> String {
        TAG.replace_all(raw, "").into_owned()
    }
}

impl<F> Sanitizer for F
where
    F: Fn(&str) -> String + Send,
{
    fn sanitize(&self, raw: &str) -> String {
        self(raw)
    }
}

impl PairingEngine {
    /// Forward a chat message to the sender's partner
    ///
    /// Unpaired senders are ignored.
    pub fn relay(&self, sender_id: ClientId, raw: &str) {
        let Some(partner_id) = self.partner_of(sender_id) else {
            debug!("Dropping message from unpaired client {}", sender_id);
            return;
        };

        let message = self.sanitizer.sanitize(raw);
        self.deliver(partner_id, ServerMessage::ReceiveMessage { message });
    }
}
