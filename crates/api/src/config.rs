use std::time::Duration;

use urbansense_events::FeedConfig;

use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// JWT token configuration (secret, expiry durations).
    pub jwt: JwtConfig,
    /// Broadcast loop tuning (tick interval, keep-alive, batch cap).
    pub feed: FeedConfig,
    /// Whether the demo reading generator runs (default: `true`).
    pub simulator_enabled: bool,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default                 |
    /// |-------------------------|-------------------------|
    /// | `HOST`                  | `0.0.0.0`               |
    /// | `PORT`                  | `3000`                  |
    /// | `CORS_ORIGINS`          | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`  | `30`                    |
    /// | `STREAM_TICK_SECS`      | `5`                     |
    /// | `STREAM_KEEPALIVE_SECS` | `30`                    |
    /// | `STREAM_BATCH_SIZE`     | `200`                   |
    /// | `SIMULATOR_ENABLED`     | `true`                  |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let simulator_enabled: bool = std::env::var("SIMULATOR_ENABLED")
            .unwrap_or_else(|_| "true".into())
            .parse()
            .expect("SIMULATOR_ENABLED must be true or false");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            jwt: JwtConfig::from_env(),
            feed: feed_config_from_env(),
            simulator_enabled,
        }
    }
}

/// Build the broadcast loop configuration from environment variables.
fn feed_config_from_env() -> FeedConfig {
    let defaults = FeedConfig::default();

    let tick_secs: u64 = std::env::var("STREAM_TICK_SECS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(defaults.tick_interval.as_secs());

    let keepalive_secs: u64 = std::env::var("STREAM_KEEPALIVE_SECS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(defaults.keepalive_interval.as_secs());

    let batch_size: i64 = std::env::var("STREAM_BATCH_SIZE")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(defaults.batch_size);

    FeedConfig {
        tick_interval: Duration::from_secs(tick_secs),
        keepalive_interval: Duration::from_secs(keepalive_secs),
        batch_size,
    }
}
