use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod client;
mod config;
mod countdown;
mod game_variant;
mod lobby;
mod lobby_coordinator;
mod messages;
mod waiting_pool;
#[cfg(test)]
mod test_utils;

use crate::client::accept_clients;
use crate::config::ServerConfig;
use crate::lobby_coordinator::lobby_coordinator;
use crate::messages::CoordinatorMessage;

/// Entry point: starts the WebSocket server and the lobby coordinator
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::load()?;
    init_logging(&config.log_level);

    let listener = TcpListener::bind(config.bind_address()).await?;
    info!("Server listening on {}", config.bind_address());

    // Create the lobby coordinator
    let (coordinator_tx, coordinator_rx) = mpsc::unbounded_channel::<CoordinatorMessage>();

    // Spawn the lobby coordinator task
    tokio::spawn(lobby_coordinator(
        coordinator_rx,
        coordinator_tx.clone(),
        config.matchmaking_settings(),
    ));

    accept_clients(listener, coordinator_tx).await;
    Ok(())
}

/// `RUST_LOG` wins over the configured level
fn init_logging(log_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
