//! Proxy event dispatch.
//!
//! Maps each proxy event to its template key, renders the configured
//! template and hands the text to the sender. Startup messaging waits for
//! the connection on its own task; every other event sends straight away
//! and is dropped if the connection is not ready yet.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::bridge::connection::ConnectionManager;
use crate::bridge::formatter::{RenderContext, TemplateRenderer};
use crate::bridge::sender::{MessageSender, SendOutcome};
use crate::common::{ConnectionState, EventKey, OutboundMessage, ProxyEvent};
use crate::config::ConfigSnapshot;
use crate::proxy::{PlayerCount, ProxyEventListener};

/// How long shutdown waits for its own message to reach Discord before
/// closing the connection.
const SHUTDOWN_FLUSH_TIMEOUT: Duration = Duration::from_secs(5);

/// Template key and player for an event.
pub fn route(event: &ProxyEvent) -> (EventKey, Option<&str>) {
    match event {
        ProxyEvent::ProcessInitialized => (EventKey::Startup, None),
        ProxyEvent::ProcessShuttingDown => (EventKey::Shutdown, None),
        ProxyEvent::SessionStarted { player } => (EventKey::Join, Some(player.as_str())),
        ProxyEvent::SessionEnded { player } => (EventKey::Leave, Some(player.as_str())),
    }
}

/// Turns proxy events into channel messages.
#[derive(Clone)]
pub struct EventDispatcher {
    config: Arc<ConfigSnapshot>,
    connection: ConnectionManager,
    sender: MessageSender,
    renderer: TemplateRenderer,
    players: Arc<dyn PlayerCount>,
}

impl EventDispatcher {
    pub fn new(
        config: Arc<ConfigSnapshot>,
        connection: ConnectionManager,
        players: Arc<dyn PlayerCount>,
    ) -> Self {
        let sender = MessageSender::new(connection.clone(), config.channel_id);
        Self {
            config,
            connection,
            sender,
            renderer: TemplateRenderer,
            players,
        }
    }

    /// Handle one event.
    ///
    /// Returns the send outcome for join and leave. Startup is scheduled
    /// and shutdown completes here, so both return `None`.
    pub async fn dispatch(&self, event: ProxyEvent) -> Option<SendOutcome> {
        match event {
            ProxyEvent::ProcessInitialized => {
                self.on_initialized();
                None
            }
            ProxyEvent::ProcessShuttingDown => {
                self.on_shutdown().await;
                None
            }
            ProxyEvent::SessionStarted { .. } | ProxyEvent::SessionEnded { .. } => {
                let (key, player) = route(&event);
                self.announce(key, player).await
            }
        }
    }

    /// Start connecting and schedule the startup message.
    ///
    /// Never blocks the caller. The returned task sends the startup message
    /// once the connection is ready, or gives up if it never will be.
    pub fn on_initialized(&self) -> JoinHandle<Option<SendOutcome>> {
        if !self.config.is_enabled() {
            info!("Discord token or channel ID not configured; bot will not start");
        } else if let Err(e) = self.connection.connect(&self.config.token) {
            warn!("Not connecting to Discord: {}", e);
        }

        let dispatcher = self.clone();
        tokio::spawn(async move {
            match dispatcher.connection.await_ready().await {
                ConnectionState::Ready => dispatcher.announce(EventKey::Startup, None).await,
                state => {
                    debug!("Skipping startup message: connection {}", state);
                    None
                }
            }
        })
    }

    /// Send the shutdown message if possible, then disconnect.
    ///
    /// Waits a bounded time for the message to land so closing the
    /// connection does not cut it off.
    pub async fn on_shutdown(&self) {
        let outcome = match self.connection.state() {
            ConnectionState::Ready => self.announce(EventKey::Shutdown, None).await,
            state => {
                debug!("Skipping shutdown message: connection {}", state);
                None
            }
        };

        if let Some(SendOutcome::Dispatched(handle)) = outcome {
            if tokio::time::timeout(SHUTDOWN_FLUSH_TIMEOUT, handle).await.is_err() {
                warn!(
                    "Shutdown message still in flight after {:?}; disconnecting anyway",
                    SHUTDOWN_FLUSH_TIMEOUT
                );
            }
        }

        self.connection.disconnect().await;
    }

    /// Render and send the template for `key`. `None` when muted.
    pub async fn announce(&self, key: EventKey, player: Option<&str>) -> Option<SendOutcome> {
        let Some(template) = self.config.template(key) else {
            debug!("No '{}' message configured", key);
            return None;
        };

        let mut ctx = RenderContext::new(self.players.online_count());
        if let Some(player) = player {
            ctx = ctx.with_player(player);
        }

        let Some(content) = self.renderer.render(template, &ctx) else {
            debug!("'{}' message is blank; nothing to send", key);
            return None;
        };

        Some(self.sender.send(OutboundMessage::new(content)).await)
    }
}

#[async_trait]
impl ProxyEventListener for EventDispatcher {
    async fn on_event(&self, event: ProxyEvent) {
        self.dispatch(event).await;
    }
}
