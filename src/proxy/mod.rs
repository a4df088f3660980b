//! Proxy event source.
//!
//! The bridge never subscribes to the proxy itself. A source calls
//! `ProxyEventListener::on_event` for every lifecycle or session event and
//! answers `PlayerCount::online_count` when a template needs it.

pub mod roster;
pub mod source;

use async_trait::async_trait;

use crate::common::ProxyEvent;

pub use roster::Roster;
pub use source::{LineEventSource, SourceExit};

/// Receives proxy events.
#[async_trait]
pub trait ProxyEventListener: Send + Sync {
    async fn on_event(&self, event: ProxyEvent);
}

/// Current number of players online, queried at render time.
pub trait PlayerCount: Send + Sync {
    fn online_count(&self) -> usize;
}
