use std::env;
use std::time::Duration;

/// Pull cadence while the fallback is active.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Feed endpoint configuration
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// REST base URL for the pull and send endpoints.
    pub http_base: String,
    /// Push channel WebSocket URL.
    pub ws_url: String,
    /// Interval between pull requests while the poll channel is active.
    pub poll_interval: Duration,
}

impl FeedConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let http = env::var("SOUK_FEED_HTTP")
            .unwrap_or_else(|_| "http://127.0.0.1:8080".to_string());
        let ws = env::var("SOUK_FEED_WS")
            .unwrap_or_else(|_| "ws://127.0.0.1:8080/ws".to_string());
        Self {
            http_base: normalize_localhost(http),
            ws_url: normalize_localhost(ws),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            http_base: "http://127.0.0.1:8080".to_string(),
            ws_url: "ws://127.0.0.1:8080/ws".to_string(),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

// Normalize localhost to IPv4 to avoid IPv6 (::1) preference on macOS
fn normalize_localhost(url: String) -> String {
    if url.contains("localhost") {
        url.replace("localhost", "127.0.0.1")
    } else {
        url
    }
}
