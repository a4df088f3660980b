//! Chat connection lifecycle.
//!
//! `ConnectionManager` owns the single Discord session and publishes its
//! state through a `watch` channel. Any number of tasks can wait on that
//! channel for readiness; the connect/disconnect transitions are the only
//! writers and always hold the slot lock while writing.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, error, info};

use crate::common::error::{ConnectionError, ConnectionResult};
use crate::common::ConnectionState;
use crate::discord::{ChatClient, ChatSession};

/// Handle to the shared connection. Clones observe the same state.
#[derive(Clone)]
pub struct ConnectionManager {
    inner: Arc<Inner>,
}

struct Inner {
    client: Arc<dyn ChatClient>,
    ready_timeout: Option<Duration>,
    state_tx: watch::Sender<ConnectionState>,
    slot: Mutex<Slot>,
}

#[derive(Default)]
struct Slot {
    /// Bumped by every `connect`; background work for an older attempt
    /// must not touch the state.
    attempt: u64,
    session: Option<Arc<dyn ChatSession>>,
}

impl ConnectionManager {
    pub fn new(client: Arc<dyn ChatClient>, ready_timeout: Option<Duration>) -> Self {
        let (state_tx, _) = watch::channel(ConnectionState::Disconnected);
        Self {
            inner: Arc::new(Inner {
                client,
                ready_timeout,
                state_tx,
                slot: Mutex::new(Slot::default()),
            }),
        }
    }

    /// Current state.
    pub fn state(&self) -> ConnectionState {
        *self.inner.state_tx.borrow()
    }

    /// Start connecting in the background.
    ///
    /// Returns immediately. An empty token leaves the manager
    /// `Disconnected` and reports `ConnectionError::Disabled`.
    pub fn connect(&self, token: &str) -> ConnectionResult<()> {
        if token.trim().is_empty() {
            return Err(ConnectionError::Disabled);
        }

        let attempt = {
            let mut slot = self.inner.slot();
            if self.state() != ConnectionState::Disconnected {
                return Err(ConnectionError::AlreadyStarted);
            }
            slot.attempt += 1;
            self.inner.state_tx.send_replace(ConnectionState::Connecting);
            slot.attempt
        };

        info!("Connecting to Discord...");
        let inner = self.inner.clone();
        let token = token.to_string();
        tokio::spawn(async move { inner.run_attempt(attempt, token).await });

        Ok(())
    }

    /// Wait until the connection is `Ready` or `Failed`.
    ///
    /// Suspends only the calling task. Returns `Disconnected` right away
    /// when no attempt is running, or as soon as `disconnect` is called.
    pub async fn await_ready(&self) -> ConnectionState {
        let mut state_rx = self.inner.state_tx.subscribe();
        let settled = match state_rx.wait_for(ConnectionState::is_settled).await {
            Ok(state) => *state,
            Err(_) => ConnectionState::Disconnected,
        };
        settled
    }

    /// The live session, only while `Ready`.
    pub fn session(&self) -> Option<Arc<dyn ChatSession>> {
        let slot = self.inner.slot();
        match self.state() {
            ConnectionState::Ready => slot.session.clone(),
            _ => None,
        }
    }

    /// Return to `Disconnected` and release the session. Idempotent.
    pub async fn disconnect(&self) {
        let session = {
            let mut slot = self.inner.slot();
            let previous = self.inner.state_tx.send_replace(ConnectionState::Disconnected);
            if previous != ConnectionState::Disconnected {
                debug!("Connection state {} -> disconnected", previous);
            }
            slot.session.take()
        };

        if let Some(session) = session {
            session.disconnect().await;
            info!("Disconnected from Discord");
        }
    }
}

impl Inner {
    fn slot(&self) -> MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Whether `attempt` is still the one the state belongs to.
    fn is_current(&self, slot: &Slot, attempt: u64) -> bool {
        slot.attempt == attempt && *self.state_tx.borrow() == ConnectionState::Connecting
    }

    async fn run_attempt(&self, attempt: u64, token: String) {
        let session = match self.client.connect(&token).await {
            Ok(session) => session,
            Err(e) => {
                self.fail(attempt, e).await;
                return;
            }
        };

        let adopted = {
            let mut slot = self.slot();
            let current = self.is_current(&slot, attempt);
            if current {
                slot.session = Some(session.clone());
            }
            current
        };
        if !adopted {
            debug!("Connection attempt {} superseded; closing its session", attempt);
            session.disconnect().await;
            return;
        }

        let ready = match self.ready_timeout {
            Some(limit) => tokio::time::timeout(limit, session.wait_ready())
                .await
                .unwrap_or(Err(ConnectionError::Timeout {
                    secs: limit.as_secs(),
                })),
            None => session.wait_ready().await,
        };

        match ready {
            Ok(()) => self.mark_ready(attempt),
            Err(e) => self.fail(attempt, e).await,
        }
    }

    fn mark_ready(&self, attempt: u64) {
        let slot = self.slot();
        if self.is_current(&slot, attempt) {
            self.state_tx.send_replace(ConnectionState::Ready);
            info!("Discord bot started");
        } else {
            debug!("Ignoring readiness of superseded attempt {}", attempt);
        }
    }

    /// Terminal for the attempt: no retry.
    async fn fail(&self, attempt: u64, e: ConnectionError) {
        let session = {
            let mut slot = self.slot();
            if !self.is_current(&slot, attempt) {
                debug!("Superseded connection attempt {} ended: {}", attempt, e);
                return;
            }
            self.state_tx.send_replace(ConnectionState::Failed);
            slot.session.take()
        };

        error!("Failed to start Discord bot: {}", e);
        if let Some(session) = session {
            session.disconnect().await;
        }
    }
}
