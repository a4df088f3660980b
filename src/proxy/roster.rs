//! Online player tracking.

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};

use crate::proxy::PlayerCount;

/// Set of players currently connected to the proxy.
///
/// Names compare case-insensitively, matching how the proxy treats them.
#[derive(Debug, Default)]
pub struct Roster {
    players: Mutex<HashSet<String>>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a login. Returns `false` if the player was already online.
    pub fn join(&self, player: &str) -> bool {
        self.players().insert(player.to_lowercase())
    }

    /// Record a disconnect. Returns `false` if the player was not online.
    pub fn leave(&self, player: &str) -> bool {
        self.players().remove(&player.to_lowercase())
    }

    fn players(&self) -> MutexGuard<'_, HashSet<String>> {
        self.players.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl PlayerCount for Roster {
    fn online_count(&self) -> usize {
        self.players().len()
    }
}
