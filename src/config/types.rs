//! Configuration type definitions.

use std::collections::HashMap;
use std::time::Duration;

use serde::Deserialize;
use serde_yaml::Value;

use crate::common::EventKey;

/// Default bound on how long the gateway may take to become ready.
pub const DEFAULT_READY_TIMEOUT_SECS: u64 = 30;

/// Config file as written by the user.
///
/// Every field is optional and scalars stay as YAML values, so a missing or
/// malformed value only disables the bridge or falls back to its default.
/// `channel_id: 123` and `channel_id: "123"` are both accepted. A section
/// that is not a mapping is a parse error and fails the whole load.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConfig {
    pub bot: Option<BotSection>,
    pub messages: Option<HashMap<String, Value>>,
}

/// `bot:` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BotSection {
    pub token: Option<Value>,
    pub channel_id: Option<Value>,
    /// Seconds to wait for the gateway ready event, `0` waits forever.
    pub ready_timeout_secs: Option<Value>,
}

/// Immutable settings read once at startup and shared by reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigSnapshot {
    pub token: String,
    pub channel_id: u64,
    pub templates: HashMap<EventKey, String>,
    pub ready_timeout: Option<Duration>,
}

impl ConfigSnapshot {
    /// Snapshot with no credentials: nothing connects, every send no-ops.
    pub fn disabled() -> Self {
        Self {
            token: String::new(),
            channel_id: 0,
            templates: HashMap::new(),
            ready_timeout: Some(Duration::from_secs(DEFAULT_READY_TIMEOUT_SECS)),
        }
    }

    /// The bridge runs only with a token and a non-zero channel id.
    pub fn is_enabled(&self) -> bool {
        !self.token.trim().is_empty() && self.channel_id != 0
    }

    /// Template configured for `key`, if any.
    pub fn template(&self, key: EventKey) -> Option<&str> {
        self.templates.get(&key).map(String::as_str)
    }
}

impl Default for ConfigSnapshot {
    fn default() -> Self {
        Self::disabled()
    }
}
