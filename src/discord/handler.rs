//! Discord gateway event handling.
//!
//! Forwards gateway lifecycle into a `watch` channel so any number of
//! tasks can wait on readiness without touching serenity types.

use serenity::async_trait;
use serenity::model::gateway::Ready;
use serenity::prelude::*;
use tokio::sync::watch;
use tracing::{info, warn};

/// Gateway status as seen by the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayStatus {
    /// Connecting, no ready event yet.
    Pending,
    /// Ready event received.
    Ready { user: String },
    /// `client.start()` returned an error.
    Failed(String),
    /// The client stopped.
    Closed,
}

impl GatewayStatus {
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }
}

/// Event handler that publishes gateway readiness.
pub struct ReadyHandler {
    status_tx: watch::Sender<GatewayStatus>,
}

impl ReadyHandler {
    pub fn new(status_tx: watch::Sender<GatewayStatus>) -> Self {
        Self { status_tx }
    }
}

#[async_trait]
impl EventHandler for ReadyHandler {
    async fn ready(&self, _context: Context, ready: Ready) {
        info!(
            "Discord bot connected as {} ({} guilds)",
            ready.user.name,
            ready.guilds.len()
        );
        if ready.guilds.is_empty() {
            warn!("Bot is not a member of any guild; channel lookups will fail");
        }
        self.status_tx.send_replace(GatewayStatus::Ready {
            user: ready.user.name.clone(),
        });
    }
}
