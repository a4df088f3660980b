//! Shared types used across the application.

use std::fmt;
use std::str::FromStr;

/// Template key selecting which configured message an event renders.
///
/// Closed set: a new event needs both a key here and a mapping in
/// `bridge::dispatcher::route`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKey {
    Startup,
    Shutdown,
    Join,
    Leave,
}

impl EventKey {
    pub const ALL: [EventKey; 4] = [Self::Startup, Self::Shutdown, Self::Join, Self::Leave];

    /// Key name as it appears under `messages:` in the config file.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Startup => "startup",
            Self::Shutdown => "shutdown",
            Self::Join => "join",
            Self::Leave => "leave",
        }
    }
}

impl fmt::Display for EventKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventKey {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "startup" => Ok(Self::Startup),
            "shutdown" => Ok(Self::Shutdown),
            "join" => Ok(Self::Join),
            "leave" => Ok(Self::Leave),
            _ => Err(()),
        }
    }
}

/// Lifecycle of the single chat gateway connection.
///
/// Within one attempt the state only moves forward:
/// `Disconnected -> Connecting -> (Ready | Failed)`. `disconnect()` returns
/// any state to `Disconnected`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    Ready,
    Failed,
}

impl ConnectionState {
    /// Whether a readiness wait should stop on this state.
    pub fn is_settled(&self) -> bool {
        !matches!(self, Self::Connecting)
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::Ready => "ready",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}
