//! Herald - Discord announcer for a game proxy
//!
//! Reads proxy lifecycle and session events and posts a configurable
//! message to one Discord text channel for each of them.

mod bridge;
mod common;
mod config;
mod discord;
mod proxy;

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info};

use bridge::{ConnectionManager, EventDispatcher};
use common::{EventKey, ProxyEvent};
use config::{env::get_config_path, load_and_validate};
use discord::SerenityClient;
use proxy::{LineEventSource, ProxyEventListener, Roster, SourceExit};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("Herald v{} starting...", env!("CARGO_PKG_VERSION"));

    let config_path = get_config_path();
    info!("Loading configuration from {}...", config_path);
    let config = Arc::new(load_and_validate(&config_path));

    if config.is_enabled() {
        info!("Configuration loaded successfully");
        info!("  Channel ID: {}", config.channel_id);
        match config.ready_timeout {
            Some(limit) => info!("  Ready timeout: {}s", limit.as_secs()),
            None => info!("  Ready timeout: none"),
        }
    }
    for key in EventKey::ALL {
        if config.template(key).is_none() {
            info!("  No '{}' message configured", key);
        }
    }

    let connection = ConnectionManager::new(Arc::new(SerenityClient::new()), config.ready_timeout);
    let roster = Arc::new(Roster::new());
    let dispatcher = Arc::new(EventDispatcher::new(config, connection, roster.clone()));

    dispatcher.dispatch(ProxyEvent::ProcessInitialized).await;

    let listener: Arc<dyn ProxyEventListener> = dispatcher.clone();
    let source = LineEventSource::new(tokio::io::stdin(), roster).run(listener);

    tokio::select! {
        exit = source => match exit {
            SourceExit::ShutdownRequested => info!("Shutdown requested by proxy"),
            SourceExit::Closed => {
                info!("Proxy event input closed; waiting for shutdown signal");
                wait_for_signal().await;
            }
        },
        _ = wait_for_signal() => {}
    }

    info!("Shutting down...");
    dispatcher.dispatch(ProxyEvent::ProcessShuttingDown).await;

    info!("Exiting...");
    Ok(())
}

/// Resolve on Ctrl+C or SIGTERM. A handler that cannot be installed is
/// treated as an immediate shutdown request.
async fn wait_for_signal() {
    if let Err(e) = shutdown_signal().await {
        error!("{:#}", e);
    }
}

async fn shutdown_signal() -> Result<()> {
    let ctrl_c = async { signal::ctrl_c().await.context("Failed to install Ctrl+C handler") };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .context("Failed to install SIGTERM handler")?
            .recv()
            .await;
        Ok::<(), anyhow::Error>(())
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<Result<()>>();

    tokio::select! {
        result = ctrl_c => {
            result?;
            info!("Received Ctrl+C");
        }
        result = terminate => {
            result?;
            info!("Received SIGTERM");
        }
    }
    Ok(())
}
