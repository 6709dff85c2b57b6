//! Connection lifecycle
//!
//! Registers and unregisters clients and keeps every client informed of the
//! number of users online.

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::client::Client;
use crate::engine::PairingEngine;
use crate::message::ServerMessage;
use crate::types::ClientId;

impl PairingEngine {
    /// Register a new client and broadcast the new user count
    pub fn connect(&mut self, client_id: ClientId, sender: mpsc::Sender<ServerMessage>) {
        if self.registry.contains(client_id) {
            warn!("Client {} is already connected", client_id);
            return;
        }

        self.registry.insert(Client::new(client_id, sender));
        info!("User Connected! Total Users Online: {}", self.users_online());
        self.broadcast_user_count();
    }

    /// Remove every trace of a client and broadcast the new user count
    ///
    /// The partner (if any) is notified first. Repeated calls for the same
    /// client are no-ops.
    pub fn disconnect(&mut self, client_id: ClientId) {
        if !self.registry.contains(client_id) {
            debug!("Ignoring repeated disconnect of {}", client_id);
            return;
        }

        self.end_pairing(client_id);
        self.pool.remove(client_id);
        self.registry.remove(client_id);

        info!("User Disconnected! Total Users Online: {}", self.users_online());
        self.broadcast_user_count();
    }

    pub fn users_online(&self) -> usize {
        self.registry.len()
    }

    /// Send the user count to every client; one failing client does not stop the rest
    ///
    /// Counts are the first thing skipped for a client that is falling behind.
    fn broadcast_user_count(&self) {
        let count = self.users_online();
        for client in self.registry.iter() {
            if let Err(e) = client.send_lossy(ServerMessage::UpdateUserCount { count }) {
                debug!("Skipped user count for {}: {}", client.id, e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compatibility::MatchRules;
    use crate::preferences::{Preferences, Selection};

    fn open() -> Preferences {
        Preferences {
            gender: "male".to_string(),
            species: "otter".to_string(),
            kinks: Selection::Any,
            match_gender: Selection::Any,
            match_species: Selection::Any,
        }
    }

    fn drain(rx: &mut mpsc::Receiver<ServerMessage>) -> Vec<ServerMessage> {
        let mut out = Vec::new();
        while let Ok(msg) = rx.try_recv() {
            out.push(msg);
        }
        out
    }

    #[tokio::test]
    async fn test_connect_broadcasts_count() {
        let mut engine = PairingEngine::new(MatchRules::default());
        let (a_tx, mut a_rx) = mpsc::channel(32);
        let (b_tx, mut b_rx) = mpsc::channel(32);

        engine.connect(ClientId::new(), a_tx);
        engine.connect(ClientId::new(), b_tx);

        assert_eq!(
            drain(&mut a_rx),
            vec![
                ServerMessage::UpdateUserCount { count: 1 },
                ServerMessage::UpdateUserCount { count: 2 },
            ]
        );
        assert_eq!(
            drain(&mut b_rx),
            vec![ServerMessage::UpdateUserCount { count: 2 }]
        );
        assert_eq!(engine.users_online(), 2);
    }

    #[tokio::test]
    async fn test_disconnect_notifies_partner() {
        let mut engine = PairingEngine::new(MatchRules::default());
        let (a_tx, _a_rx) = mpsc::channel(32);
        let (b_tx, mut b_rx) = mpsc::channel(32);
        let (a, b) = (ClientId::new(), ClientId::new());
        engine.connect(a, a_tx);
        engine.connect(b, b_tx);
        engine.seek(a, open());
        engine.seek(b, open());
        drain(&mut b_rx);

        engine.disconnect(a);

        assert_eq!(
            drain(&mut b_rx),
            vec![
                ServerMessage::PartnerDisconnected,
                ServerMessage::UpdateUserCount { count: 1 },
            ]
        );
        assert_eq!(engine.partner_of(b), None);
        assert_eq!(engine.users_online(), 1);
        assert!(engine.snapshot().is_consistent());
    }

    #[tokio::test]
    async fn test_disconnect_leaves_pool() {
        let mut engine = PairingEngine::new(MatchRules::default());
        let (a_tx, _a_rx) = mpsc::channel(32);
        let a = ClientId::new();
        engine.connect(a, a_tx);
        engine.seek(a, open());
        assert!(engine.is_waiting(a));

        engine.disconnect(a);

        assert!(!engine.is_waiting(a));
        assert_eq!(engine.snapshot(), Default::default());
    }

    #[tokio::test]
    async fn test_disconnect_twice_is_noop() {
        let mut engine = PairingEngine::new(MatchRules::default());
        let (a_tx, _a_rx) = mpsc::channel(32);
        let (b_tx, mut b_rx) = mpsc::channel(32);
        let (a, b) = (ClientId::new(), ClientId::new());
        engine.connect(a, a_tx);
        engine.connect(b, b_tx);
        engine.seek(a, open());
        engine.seek(b, open());

        engine.disconnect(a);
        let after_first = engine.snapshot();
        drain(&mut b_rx);

        engine.disconnect(a);

        assert_eq!(engine.snapshot(), after_first);
        assert!(drain(&mut b_rx).is_empty());
        assert_eq!(engine.users_online(), 1);
    }

    #[tokio::test]
    async fn test_slow_client_still_gets_partner() {
        let mut engine = PairingEngine::new(MatchRules::default());
        let (a_tx, mut a_rx) = mpsc::channel(4);
        let a = ClientId::new();
        engine.connect(a, a_tx);
        engine.seek(a, open());

        // a never drains; these counts fill its channel down to the reserve
        let mut others = Vec::new();
        for _ in 0..3 {
            let (tx, rx) = mpsc::channel(32);
            engine.connect(ClientId::new(), tx);
            others.push(rx);
        }
        let (b_tx, _b_rx) = mpsc::channel(32);
        let b = ClientId::new();
        engine.connect(b, b_tx);
        engine.seek(b, open());

        assert_eq!(engine.partner_of(a), Some(b));
        assert_eq!(
            drain(&mut a_rx).last(),
            Some(&ServerMessage::PartnerConnected {
                gender: "male".to_string(),
                species: "otter".to_string(),
                kinks: "any".to_string(),
            })
        );
    }

    #[tokio::test]
    async fn test_broadcast_survives_dead_client() {
        let mut engine = PairingEngine::new(MatchRules::default());
        let (a_tx, a_rx) = mpsc::channel(32);
        let (b_tx, mut b_rx) = mpsc::channel(32);
        engine.connect(ClientId::new(), a_tx);
        drop(a_rx);

        engine.connect(ClientId::new(), b_tx);

        assert_eq!(
            drain(&mut b_rx),
            vec![ServerMessage::UpdateUserCount { count: 2 }]
        );
    }
}
