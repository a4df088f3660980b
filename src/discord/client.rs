//! Discord client abstraction.
//!
//! The bridge talks to Discord only through these traits, so the serenity
//! implementation stays behind `discord::gateway` and tests can swap in a
//! scripted client.

use std::sync::Arc;

use async_trait::async_trait;

use crate::common::error::{ConnectionResult, DiscordResult};

/// A guild text channel the bot can post to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextChannel {
    pub id: u64,
    pub name: String,
}

/// Opens gateway sessions.
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Build a client for `token` and start it in the background.
    ///
    /// Returns once the session exists; readiness is awaited separately.
    async fn connect(&self, token: &str) -> ConnectionResult<Arc<dyn ChatSession>>;
}

/// One live gateway session.
#[async_trait]
pub trait ChatSession: Send + Sync {
    /// Resolve when the gateway reports ready, or fail if it never will.
    async fn wait_ready(&self) -> ConnectionResult<()>;

    /// Look up a channel the bot can post to.
    async fn resolve_channel(&self, channel_id: u64) -> DiscordResult<TextChannel>;

    /// Post `content` and wait for Discord to accept it.
    async fn send_message(&self, channel: &TextChannel, content: &str) -> DiscordResult<()>;

    /// Close the session. Safe to call more than once.
    async fn disconnect(&self);
}
