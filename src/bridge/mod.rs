//! Proxy-to-Discord bridge.
//!
//! ## Module Structure
//!
//! - `connection`: Discord session lifecycle (`ConnectionManager`)
//! - `dispatcher`: Event routing and startup/shutdown sequencing (`EventDispatcher`)
//! - `formatter`: Placeholder substitution (`TemplateRenderer`)
//! - `sender`: Fire-and-forget delivery (`MessageSender`)

pub mod connection;
pub mod dispatcher;
pub mod formatter;
pub mod sender;

pub use connection::ConnectionManager;
pub use dispatcher::EventDispatcher;
