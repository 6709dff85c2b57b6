//! Connection registry
//!
//! Maps connection identity to the client handle used to reach it.

use std::collections::HashMap;

use crate::client::Client;
use crate::types::ClientId;

/// All connected clients: ClientId -> Client
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    clients: HashMap<ClientId, Client>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a client, returning the one it replaced (if any)
    pub fn insert(&mut self, client: Client) -> Option<Client> {
        self.clients.insert(client.id, client)
    }

    pub fn get(&self, id: ClientId) -> Option<&Client> {
        self.clients.get(&id)
    }

    pub fn get_mut(&mut self, id: ClientId) -> Option<&mut Client> {
        self.clients.get_mut(&id)
    }

    pub fn remove(&mut self, id: ClientId) -> Option<Client> {
        self.clients.remove(&id)
    }

    pub fn contains(&self, id: ClientId) -> bool {
        self.clients.contains_key(&id)
    }

    /// Registered and still able to receive messages
    ///
    /// A client whose write task has ended but whose disconnect has not been
    /// processed yet counts as stale.
    pub fn is_live(&self, id: ClientId) -> bool {
        self.clients.get(&id).is_some_and(Client::is_live)
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Client> {
        self.clients.values()
    }
}
