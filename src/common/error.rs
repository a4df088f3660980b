//! Error types for the application.
//!
//! None of these cross into the proxy event path: every component absorbs
//! its own failures and turns them into log lines.

use thiserror::Error;

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {message}")]
    ParseError { message: String },

    #[error("Missing required field: {field}")]
    MissingField { field: String },

    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// Chat gateway connection errors.
#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("Bridge disabled: no bot token configured")]
    Disabled,

    #[error("A connection attempt is already in progress or established")]
    AlreadyStarted,

    #[error("Failed to connect to Discord: {message}")]
    ConnectFailed { message: String },

    #[error("Timed out after {secs}s waiting for Discord to become ready")]
    Timeout { secs: u64 },

    #[error("Connection closed before becoming ready")]
    ConnectionClosed,
}

/// Discord channel and delivery errors.
#[derive(Debug, Error)]
pub enum DiscordError {
    #[error("Channel not found or not accessible: {channel_id}")]
    ChannelNotFound { channel_id: u64 },

    #[error("Channel {channel_id} is not a text channel")]
    NotTextChannel { channel_id: u64 },

    #[error("Failed to send message: {message}")]
    SendFailed { message: String },

    #[error("Serenity error: {0}")]
    Serenity(#[from] serenity::Error),
}

/// Result type alias for connection operations.
pub type ConnectionResult<T> = std::result::Result<T, ConnectionError>;

/// Result type alias for Discord operations.
pub type DiscordResult<T> = std::result::Result<T, DiscordError>;
