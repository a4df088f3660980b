//! Discord bot integration.
//!
//! This module provides the chat client the bridge posts through.

pub mod client;
pub mod gateway;
pub mod handler;

#[cfg(test)]
pub mod mock;

// Re-export main types for external use
pub use client::{ChatClient, ChatSession};
pub use gateway::SerenityClient;
