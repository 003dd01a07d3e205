pub mod cache;
pub mod error;
pub mod extract;
pub mod routes;
pub mod types;
pub mod youtube;

use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;

use cache::ChannelCache;
use error::ChannelError;
use routes::{build_router, ApiState};
use youtube::YouTubeService;

pub const DEFAULT_PORT: u16 = 3000;
/// How long an aggregated record is served without re-fetching.
pub const CACHE_TTL: Duration = Duration::from_secs(10 * 60);

// ── Configuration ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct ChannelConfig {
    /// Channel handle without the leading `@`.
    pub handle: String,
    /// Optional pre-resolved channel id; skips handle resolution when set.
    pub channel_id: Option<String>,
    pub port: u16,
}

impl ChannelConfig {
    pub fn from_env() -> Result<Self, ChannelError> {
        let handle = std::env::var("YT_CHANNEL_HANDLE")
            .ok()
            .as_deref()
            .and_then(normalize_handle)
            .ok_or_else(|| ChannelError::Config("YT_CHANNEL_HANDLE is not set".into()))?;

        let channel_id = std::env::var("YT_CHANNEL_ID")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let port = std::env::var("PORT")
            .ok()
            .and_then(|s| s.trim().parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);

        Ok(Self {
            handle,
            channel_id,
            port,
        })
    }
}

fn normalize_handle(raw: &str) -> Option<String> {
    let handle = raw.trim().trim_start_matches('@');
    if handle.is_empty() {
        None
    } else {
        Some(handle.to_string())
    }
}

// ── Application state ─────────────────────────────────────────────────────────

pub struct AppState {
    pub config: ChannelConfig,
    pub api_state: ApiState,
}

impl AppState {
    pub fn new(config: ChannelConfig) -> Self {
        let youtube = Arc::new(YouTubeService::new(
            config.handle.clone(),
            config.channel_id.clone(),
        ));
        let cache = Arc::new(ChannelCache::new(CACHE_TTL));

        let api_state = ApiState { youtube, cache };

        Self { config, api_state }
    }
}

// ── Server entry ──────────────────────────────────────────────────────────────

pub async fn start_server(state: Arc<AppState>) {
    let router = build_router(state.api_state.clone());
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], state.config.port));

    match TcpListener::bind(addr).await {
        Ok(listener) => {
            tracing::info!(%addr, "HTTP server listening");
            if let Err(e) = axum::serve(listener, router).await {
                tracing::error!(error = %e, "server error");
            }
        }
        Err(e) => {
            tracing::error!(error = %e, port = state.config.port, "failed to bind port");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handle_normalization_strips_decoration() {
        assert_eq!(normalize_handle("@SomeChannel").as_deref(), Some("SomeChannel"));
        assert_eq!(normalize_handle("  plain \n").as_deref(), Some("plain"));
        assert_eq!(normalize_handle("@"), None);
        assert_eq!(normalize_handle("   "), None);
    }
}
