//! Serenity-backed chat client.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serenity::all::ShardManager;
use serenity::http::{Http, HttpBuilder};
use serenity::model::channel::{Channel, ChannelType};
use serenity::model::id::ChannelId;
use serenity::prelude::*;
use serenity::Client;
use tokio::sync::watch;
use tracing::{debug, error, info};

use crate::common::error::{ConnectionError, ConnectionResult, DiscordError, DiscordResult};
use crate::discord::client::{ChatClient, ChatSession, TextChannel};
use crate::discord::handler::{GatewayStatus, ReadyHandler};

/// Opens serenity gateway sessions.
#[derive(Debug, Default)]
pub struct SerenityClient;

impl SerenityClient {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ChatClient for SerenityClient {
    async fn connect(&self, token: &str) -> ConnectionResult<Arc<dyn ChatSession>> {
        let (status_tx, status_rx) = watch::channel(GatewayStatus::Pending);

        let client = build_client(token, status_tx.clone()).await?;

        let http = client.http.clone();
        let shard_manager = client.shard_manager.clone();

        tokio::spawn(run_client(client, status_tx));

        Ok(Arc::new(SerenitySession {
            http,
            shard_manager,
            status_rx,
            closed: AtomicBool::new(false),
        }))
    }
}

async fn build_client(
    token: &str,
    status_tx: watch::Sender<GatewayStatus>,
) -> ConnectionResult<Client> {
    let connect_failed = |message: String| ConnectionError::ConnectFailed { message };

    // Channel lookups and posting only need guild metadata.
    let intents = GatewayIntents::GUILDS;

    // Build a custom reqwest client with timeout settings
    let reqwest_client = reqwest::Client::builder()
        .timeout(Duration::from_secs(15))
        .connect_timeout(Duration::from_secs(10))
        .build()
        .map_err(|e| connect_failed(format!("failed to build HTTP client: {}", e)))?;

    let http = HttpBuilder::new(token).client(reqwest_client).build();

    let client = serenity::client::ClientBuilder::new_with_http(http, intents)
        .event_handler(ReadyHandler::new(status_tx))
        .await
        .map_err(|e| connect_failed(e.to_string()))?;
    Ok(client)
}

/// Drive the gateway until it stops, publishing how it ended.
async fn run_client(mut client: Client, status_tx: watch::Sender<GatewayStatus>) {
    match client.start().await {
        Ok(()) => {
            info!("Discord client disconnected normally");
            status_tx.send_replace(GatewayStatus::Closed);
        }
        Err(e) => {
            error!("Discord client error: {}", e);
            status_tx.send_replace(GatewayStatus::Failed(e.to_string()));
        }
    }
}

/// A running serenity client.
pub struct SerenitySession {
    http: Arc<Http>,
    shard_manager: Arc<ShardManager>,
    status_rx: watch::Receiver<GatewayStatus>,
    closed: AtomicBool,
}

#[async_trait]
impl ChatSession for SerenitySession {
    async fn wait_ready(&self) -> ConnectionResult<()> {
        let mut status_rx = self.status_rx.clone();
        let status = status_rx
            .wait_for(|status| !status.is_pending())
            .await
            .map_err(|_| ConnectionError::ConnectionClosed)?
            .clone();

        match status {
            GatewayStatus::Ready { user } => {
                debug!("Gateway session ready as {}", user);
                Ok(())
            }
            GatewayStatus::Failed(message) => Err(ConnectionError::ConnectFailed { message }),
            GatewayStatus::Pending | GatewayStatus::Closed => Err(ConnectionError::ConnectionClosed),
        }
    }

    async fn resolve_channel(&self, channel_id: u64) -> DiscordResult<TextChannel> {
        if channel_id == 0 {
            return Err(DiscordError::ChannelNotFound { channel_id });
        }

        let channel = match self.http.get_channel(ChannelId::new(channel_id)).await {
            Ok(channel) => channel,
            // Discord answered: unknown id or no access.
            Err(serenity::Error::Http(ref e)) if e.status_code().is_some() => {
                debug!("Channel {} lookup rejected: {}", channel_id, e);
                return Err(DiscordError::ChannelNotFound { channel_id });
            }
            Err(e) => return Err(e.into()),
        };

        match channel {
            Channel::Guild(channel)
                if matches!(channel.kind, ChannelType::Text | ChannelType::News) =>
            {
                Ok(TextChannel {
                    id: channel.id.get(),
                    name: channel.name,
                })
            }
            _ => Err(DiscordError::NotTextChannel { channel_id }),
        }
    }

    async fn send_message(&self, channel: &TextChannel, content: &str) -> DiscordResult<()> {
        ChannelId::new(channel.id)
            .say(&self.http, content)
            .await
            .map(|_| ())
            .map_err(|e| DiscordError::SendFailed {
                message: e.to_string(),
            })
    }

    async fn disconnect(&self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        info!("Initiating graceful Discord shutdown...");
        self.shard_manager.shutdown_all().await;
        info!("Discord shutdown complete");
    }
}
