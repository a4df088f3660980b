//! Message types flowing through the bridge.

/// Lifecycle or session event delivered by the proxy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProxyEvent {
    /// The proxy finished initializing.
    ProcessInitialized,
    /// The proxy is shutting down.
    ProcessShuttingDown,
    /// A player logged in.
    SessionStarted { player: String },
    /// A player disconnected.
    SessionEnded { player: String },
}

/// Rendered text bound for the configured channel.
///
/// Built, sent once, and dropped. Nothing queues or persists it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub content: String,
}

impl OutboundMessage {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}
