//! Waiting pool
//!
//! Clients that sought a partner and found none wait here in arrival order.
//! The earliest compatible entry is always the one handed out.

use std::collections::VecDeque;

use tracing::debug;

use crate::compatibility::MatchRules;
use crate::preferences::Preferences;
use crate::types::ClientId;

/// A client waiting for a partner
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaitingEntry {
    pub client_id: ClientId,
    pub preferences: Preferences,
}

/// FIFO of waiting clients, at most one entry per client
#[derive(Debug, Default)]
pub struct WaitingPool {
    entries: VecDeque<WaitingEntry>,
}

impl WaitingPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry unless its client is already waiting
    ///
    /// Returns false (and leaves the pool untouched) for a duplicate.
    pub fn enqueue(&mut self, entry: WaitingEntry) -> bool {
        if self.contains(entry.client_id) {
            return false;
        }
        self.entries.push_back(entry);
        true
    }

    /// Remove and return the first entry compatible with `requester`
    ///
    /// Entries belonging to `exclude` are skipped. Entries for which `is_live`
    /// is false are dropped from the pool as they are encountered.
    pub fn take_first_compatible<F>(
        &mut self,
        requester: &Preferences,
        exclude: ClientId,
        rules: &MatchRules,
        is_live: F,
    ) -> Option<WaitingEntry>
    where
        F: Fn(ClientId) -> bool,
    {
        let mut i = 0;
        while i < self.entries.len() {
            let entry = &self.entries[i];

            if !is_live(entry.client_id) {
                debug!("Dropping stale waiting entry {}", entry.client_id);
                self.entries.remove(i);
                continue;
            }

            if entry.client_id != exclude
                && rules.compatible(requester, &entry.preferences)
                && rules.compatible(&entry.preferences, requester)
            {
                return self.entries.remove(i);
            }

            i += 1;
        }
        None
    }

    /// Remove a client's entry, if present
    pub fn remove(&mut self, client_id: ClientId) -> Option<WaitingEntry> {
        let index = self.entries.iter().position(|e| e.client_id == client_id)?;
        self.entries.remove(index)
    }

    pub fn contains(&self, client_id: ClientId) -> bool {
        self.entries.iter().any(|e| e.client_id == client_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &WaitingEntry> {
        self.entries.iter()
    }
}
