//! Scripted chat client for tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::watch;

use crate::common::error::{ConnectionError, ConnectionResult, DiscordError, DiscordResult};
use crate::discord::client::{ChatClient, ChatSession, TextChannel};

/// Counters shared by a mock client and every session it opens.
#[derive(Debug, Default)]
pub struct Calls {
    pub connects: AtomicUsize,
    pub resolves: AtomicUsize,
    pub disconnects: AtomicUsize,
    sent: Mutex<Vec<(u64, String)>>,
}

impl Calls {
    pub fn connects(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }

    pub fn resolves(&self) -> usize {
        self.resolves.load(Ordering::SeqCst)
    }

    pub fn disconnects(&self) -> usize {
        self.disconnects.load(Ordering::SeqCst)
    }

    /// Contents of every delivery call, in order.
    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().iter().map(|(_, c)| c.clone()).collect()
    }

    pub fn sent_to(&self) -> Vec<u64> {
        self.sent.lock().unwrap().iter().map(|(id, _)| *id).collect()
    }
}

/// Releases a gated mock session's readiness.
pub struct ReadyGate(watch::Sender<bool>);

impl ReadyGate {
    pub fn open(&self) {
        self.0.send_replace(true);
    }
}

#[derive(Clone, Default)]
pub struct MockChatClient {
    pub calls: Arc<Calls>,
    channels: Vec<u64>,
    connect_error: Option<String>,
    ready_error: Option<String>,
    send_error: Option<String>,
    gate: Option<watch::Receiver<bool>>,
}

impl MockChatClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `channel_id` resolvable.
    pub fn with_channel(mut self, channel_id: u64) -> Self {
        self.channels.push(channel_id);
        self
    }

    pub fn failing_connect(mut self, message: &str) -> Self {
        self.connect_error = Some(message.to_string());
        self
    }

    pub fn failing_ready(mut self, message: &str) -> Self {
        self.ready_error = Some(message.to_string());
        self
    }

    pub fn failing_send(mut self, message: &str) -> Self {
        self.send_error = Some(message.to_string());
        self
    }

    /// Hold readiness until the returned gate is opened.
    pub fn gated(mut self) -> (Self, ReadyGate) {
        let (tx, rx) = watch::channel(false);
        self.gate = Some(rx);
        (self, ReadyGate(tx))
    }
}

#[async_trait]
impl ChatClient for MockChatClient {
    async fn connect(&self, _token: &str) -> ConnectionResult<Arc<dyn ChatSession>> {
        self.calls.connects.fetch_add(1, Ordering::SeqCst);
        if let Some(ref message) = self.connect_error {
            return Err(ConnectionError::ConnectFailed {
                message: message.clone(),
            });
        }
        Ok(Arc::new(MockSession {
            client: self.clone(),
        }))
    }
}

struct MockSession {
    client: MockChatClient,
}

#[async_trait]
impl ChatSession for MockSession {
    async fn wait_ready(&self) -> ConnectionResult<()> {
        if let Some(mut gate) = self.client.gate.clone() {
            gate.wait_for(|open| *open)
                .await
                .map_err(|_| ConnectionError::ConnectionClosed)?;
        }
        match self.client.ready_error {
            Some(ref message) => Err(ConnectionError::ConnectFailed {
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }

    async fn resolve_channel(&self, channel_id: u64) -> DiscordResult<TextChannel> {
        self.client.calls.resolves.fetch_add(1, Ordering::SeqCst);
        if self.client.channels.contains(&channel_id) {
            Ok(TextChannel {
                id: channel_id,
                name: format!("channel-{}", channel_id),
            })
        } else {
            Err(DiscordError::ChannelNotFound { channel_id })
        }
    }

    async fn send_message(&self, channel: &TextChannel, content: &str) -> DiscordResult<()> {
        self.client
            .calls
            .sent
            .lock()
            .unwrap()
            .push((channel.id, content.to_string()));
        match self.client.send_error {
            Some(ref message) => Err(DiscordError::SendFailed {
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }

    async fn disconnect(&self) {
        self.client.calls.disconnects.fetch_add(1, Ordering::SeqCst);
    }
}
