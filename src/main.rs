use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use channelboard::server::{self, AppState, ChannelConfig};

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match ChannelConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "invalid configuration");
            std::process::exit(1);
        }
    };

    tracing::info!(handle = %config.handle, port = config.port, "starting channelboard");

    let state = Arc::new(AppState::new(config));
    server::start_server(state).await;
}
