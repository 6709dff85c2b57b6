//! Pairing engine
//!
//! Owns every piece of shared pairing state: the connection registry, the
//! waiting pool and the partner links stored on each client. Each client
//! moves through `Idle -> Waiting -> Paired`, and every transition updates
//! both sides of a pairing before returning.
//!
//! The engine is a plain owned value. `PairingServer` serializes access to
//! it by processing one command at a time.

use std::collections::HashMap;

use tracing::{debug, info, warn};

use crate::client::{Client, Partner};
use crate::compatibility::MatchRules;
use crate::message::ServerMessage;
use crate::pool::{WaitingEntry, WaitingPool};
use crate::preferences::{Preferences, PreferencesPayload};
use crate::registry::ConnectionRegistry;
use crate::relay::{Sanitizer, StripTags};
use crate::types::ClientId;

/// Matching state and the transitions over it
pub struct PairingEngine {
    pub(crate) registry: ConnectionRegistry,
    pub(crate) pool: WaitingPool,
    pub(crate) sanitizer: Box<dyn Sanitizer>,
    rules: MatchRules,
}

impl PairingEngine {
    /// Create an empty engine that strips markup from relayed messages
    pub fn new(rules: MatchRules) -> Self {
        Self::with_sanitizer(rules, StripTags)
    }

    /// Create an empty engine with a custom message sanitizer
    pub fn with_sanitizer(rules: MatchRules, sanitizer: impl Sanitizer + 'static) -> Self {
        Self {
            registry: ConnectionRegistry::new(),
            pool: WaitingPool::new(),
            sanitizer: Box::new(sanitizer),
            rules,
        }
    }

    pub fn rules(&self) -> &MatchRules {
        &self.rules
    }

    /// Handle a `find_partner` request straight off the wire
    ///
    /// Invalid preferences are dropped without any state change or reply.
    pub fn find_partner(&mut self, client_id: ClientId, payload: PreferencesPayload) {
        match Preferences::try_from(payload) {
            Ok(preferences) => self.seek(client_id, preferences),
            Err(e) => debug!("Ignoring seek from {}: {}", client_id, e),
        }
    }

    /// Look for a partner with validated preferences
    ///
    /// Any existing pairing is torn down first, and any older waiting entry
    /// is replaced. The client either ends up paired with the earliest
    /// compatible waiting client or waiting itself.
    pub fn seek(&mut self, client_id: ClientId, preferences: Preferences) {
        if !self.registry.contains(client_id) {
            debug!("Ignoring seek from unknown client {}", client_id);
            return;
        }

        self.end_pairing(client_id);
        self.pool.remove(client_id);

        let registry = &self.registry;
        let found = self.pool.take_first_compatible(
            &preferences,
            client_id,
            &self.rules,
            |id| registry.is_live(id),
        );

        match found {
            Some(partner) => self.pair(client_id, preferences, partner),
            None => {
                self.pool.enqueue(WaitingEntry {
                    client_id,
                    preferences,
                });
                debug!(
                    "No match for {}, waiting ({} in pool)",
                    client_id,
                    self.pool.len()
                );
                self.deliver(client_id, ServerMessage::NoMatch);
            }
        }
    }

    /// Link two clients as partners and tell each about the other
    fn pair(&mut self, client_id: ClientId, preferences: Preferences, found: WaitingEntry) {
        let to_client = partner_connected(&found.preferences);
        let to_partner = partner_connected(&preferences);

        if let Some(client) = self.registry.get_mut(client_id) {
            client.partner = Some(Partner {
                id: found.client_id,
                preferences: found.preferences,
            });
        }
        if let Some(partner) = self.registry.get_mut(found.client_id) {
            partner.partner = Some(Partner {
                id: client_id,
                preferences,
            });
        }

        info!("Paired {} with {}", client_id, found.client_id);

        self.deliver(client_id, to_client);
        self.deliver(found.client_id, to_partner);
    }

    /// Clear a client's pairing on both sides and notify the former partner
    ///
    /// Returns the former partner's id, or None if the client was not paired.
    pub(crate) fn end_pairing(&mut self, client_id: ClientId) -> Option<ClientId> {
        let partner_id = self.registry.get_mut(client_id)?.partner.take()?.id;

        if let Some(partner) = self.registry.get_mut(partner_id) {
            if partner.partner_id() == Some(client_id) {
                partner.partner = None;
            }
            notify(partner, ServerMessage::PartnerDisconnected);
        }

        info!("Pairing of {} and {} ended", client_id, partner_id);
        Some(partner_id)
    }

    /// Send a message to a registered client, logging delivery failures
    pub(crate) fn deliver(&self, client_id: ClientId, msg: ServerMessage) {
        match self.registry.get(client_id) {
            Some(client) => notify(client, msg),
            None => debug!("Dropping message for unknown client {}", client_id),
        }
    }

    /// Current partner of a client
    pub fn partner_of(&self, client_id: ClientId) -> Option<ClientId> {
        self.registry.get(client_id).and_then(Client::partner_id)
    }

    /// Check whether a client is in the waiting pool
    pub fn is_waiting(&self, client_id: ClientId) -> bool {
        self.pool.contains(client_id)
    }

    pub fn waiting_count(&self) -> usize {
        self.pool.len()
    }

    /// Point-in-time copy of the pairing state
    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            users_online: self.registry.len(),
            waiting: self.pool.iter().map(|e| e.client_id).collect(),
            partners: self
                .registry
                .iter()
                .filter_map(|c| c.partner_id().map(|p| (c.id, p)))
                .collect(),
        }
    }
}

/// Read-only view of the engine state, in waiting-pool order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineSnapshot {
    pub users_online: usize,
    pub waiting: Vec<ClientId>,
    pub partners: HashMap<ClientId, ClientId>,
}

impl EngineSnapshot {
    /// Every pairing is mutual and nobody is both paired and waiting
    pub fn is_consistent(&self) -> bool {
        let mutual = self
            .partners
            .iter()
            .all(|(client, partner)| self.partners.get(partner) == Some(client));
        let disjoint = self.waiting.iter().all(|id| !self.partners.contains_key(id));
        mutual && disjoint
    }
}

fn partner_connected(preferences: &Preferences) -> ServerMessage {
    ServerMessage::PartnerConnected {
        gender: preferences.gender.clone(),
        species: preferences.species.clone(),
        kinks: preferences.kinks.to_string(),
    }
}

pub(crate) fn notify(client: &Client, msg: ServerMessage) {
    if let Err(e) = client.send(msg) {
        warn!("Failed to deliver message to {}: {}", client.id, e);
    }
}
