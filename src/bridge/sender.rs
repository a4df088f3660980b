//! Outbound delivery to the configured channel.

use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

use crate::bridge::connection::ConnectionManager;
use crate::common::OutboundMessage;

/// What `MessageSender::send` did with a message.
#[derive(Debug)]
pub enum SendOutcome {
    /// Connection not ready; message dropped.
    NotReady,
    /// Channel id did not resolve to a usable channel; message dropped.
    ChannelUnavailable,
    /// Delivery running in the background. Awaiting the handle is optional.
    Dispatched(JoinHandle<()>),
}

/// Posts rendered messages to the single configured channel.
///
/// Failures never reach the caller; each one is logged and the message is
/// lost. There is no queue and no retry.
#[derive(Clone)]
pub struct MessageSender {
    connection: ConnectionManager,
    channel_id: u64,
}

impl MessageSender {
    pub fn new(connection: ConnectionManager, channel_id: u64) -> Self {
        Self {
            connection,
            channel_id,
        }
    }

    /// Send `message` without waiting for Discord to acknowledge it.
    pub async fn send(&self, message: OutboundMessage) -> SendOutcome {
        let Some(session) = self.connection.session() else {
            warn!(
                "Discord not ready ({}); cannot send message: {}",
                self.connection.state(),
                message.content
            );
            return SendOutcome::NotReady;
        };

        let channel = match session.resolve_channel(self.channel_id).await {
            Ok(channel) => channel,
            Err(e) => {
                warn!(
                    "Text channel with id {} not found or bot doesn't have access: {}",
                    self.channel_id, e
                );
                return SendOutcome::ChannelUnavailable;
            }
        };

        let handle = tokio::spawn(async move {
            match session.send_message(&channel, &message.content).await {
                Ok(()) => debug!("Sent to #{}: {}", channel.name, message.content),
                Err(e) => error!("Failed to send Discord message to #{}: {}", channel.name, e),
            }
        });

        SendOutcome::Dispatched(handle)
    }
}
