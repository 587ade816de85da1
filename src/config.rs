//! Server configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`). Every key has a default suitable for
//! running on a local network.
//!
//! | Env Var                | Default              |
//! |------------------------|----------------------|
//! | `HOST`                 | `0.0.0.0`            |
//! | `PORT`                 | `5000`               |
//! | `FRONTEND_PATH`        | `../frontend/dist`   |
//! | `APP_ENV`              | `development`        |
//! | `CORS_ORIGINS`         | (empty)              |
//! | `EVENT_BUS_CAPACITY`   | `1024`               |
//! | `WS_BROADCAST_SCOPE`   | `global`             |
//! | `REQUEST_TIMEOUT_SECS` | `30`                 |
//! | `SEED_DEMO_DATA`       | `true`               |
//! | `LOG_FORMAT`           | `text`               |

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use anyhow::Context;

use crate::cors::OriginPolicy;

/// Deployment environment. Selects the CORS policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Environment {
    /// Accept any origin on the local network.
    #[default]
    Development,
    /// Accept only the configured allow-list.
    Production,
}

/// Which realtime connections receive an order event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BroadcastScope {
    /// Every connection receives every event.
    #[default]
    Global,
    /// Updates, deletions and comments only reach connections subscribed
    /// to that order; creations still reach everyone.
    Topic,
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

/// Top-level server configuration.
///
/// Loaded once at startup via [`ServerConfig::from_env`].
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Socket address to bind the HTTP server to.
    pub listen_addr: SocketAddr,

    /// Directory holding the built single-page application.
    pub frontend_dir: PathBuf,

    /// Deployment environment.
    pub environment: Environment,

    /// Exact origins accepted in production.
    pub cors_origins: Vec<String>,

    /// Capacity of the EventBus broadcast channel.
    pub event_bus_capacity: usize,

    /// Realtime delivery scope.
    pub broadcast_scope: BroadcastScope,

    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,

    /// Preload the demo users and order.
    pub seed_demo_data: bool,

    /// Log output format.
    pub log_format: LogFormat,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 5000),
            frontend_dir: PathBuf::from("../frontend/dist"),
            environment: Environment::Development,
            cors_origins: Vec::new(),
            event_bus_capacity: 1024,
            broadcast_scope: BroadcastScope::Global,
            request_timeout_secs: 30,
            seed_demo_data: true,
            log_format: LogFormat::Text,
        }
    }
}

impl ServerConfig {
    /// Loads configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file
    /// first.
    ///
    /// # Errors
    ///
    /// Returns an error if `HOST` or `PORT` cannot be parsed.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns an error if `HOST` or `PORT` cannot be parsed.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let host: IpAddr = match lookup("HOST") {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("HOST is not an IP address: {raw}"))?,
            None => defaults.listen_addr.ip(),
        };
        let port: u16 = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("PORT is not a valid port: {raw}"))?,
            None => defaults.listen_addr.port(),
        };

        let environment = match lookup("APP_ENV").as_deref().map(str::trim) {
            Some("production" | "prod") => Environment::Production,
            _ => Environment::Development,
        };

        let broadcast_scope = match lookup("WS_BROADCAST_SCOPE").as_deref().map(str::trim) {
            Some("topic") => BroadcastScope::Topic,
            _ => BroadcastScope::Global,
        };

        let log_format = match lookup("LOG_FORMAT").as_deref().map(str::trim) {
            Some("json") => LogFormat::Json,
            _ => LogFormat::Text,
        };

        let cors_origins = lookup("CORS_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            listen_addr: SocketAddr::new(host, port),
            frontend_dir: lookup("FRONTEND_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.frontend_dir),
            environment,
            cors_origins,
            event_bus_capacity: parse_or(&lookup, "EVENT_BUS_CAPACITY", defaults.event_bus_capacity),
            broadcast_scope,
            request_timeout_secs: parse_or(
                &lookup,
                "REQUEST_TIMEOUT_SECS",
                defaults.request_timeout_secs,
            ),
            seed_demo_data: parse_bool_or(&lookup, "SEED_DEMO_DATA", defaults.seed_demo_data),
            log_format,
        })
    }

    /// Origin policy for the configured environment.
    #[must_use]
    pub fn origin_policy(&self) -> OriginPolicy {
        match self.environment {
            Environment::Production => OriginPolicy::AllowList(self.cors_origins.clone()),
            Environment::Development => OriginPolicy::LocalNetwork,
        }
    }
}

/// Parses `key` as `T`, returning `default` on missing or invalid values.
fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    lookup(key)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// Parses `key` as a boolean. Accepts `"true"`, `"1"`, `"false"`, `"0"`
/// (case-insensitive). Returns `default` otherwise.
fn parse_bool_or<F>(lookup: &F, key: &str, default: bool) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key).map(|v| v.trim().to_ascii_lowercase()).as_deref() {
        Some("true" | "1") => true,
        Some("false" | "0") => false,
        _ => default,
    }
}
