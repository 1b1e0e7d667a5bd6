//! Configuration for the StaticEdge handler and server.
//!
//! All configuration is driven by environment variables, read once at
//! process start and passed down immutably; there is no ambient global
//! state.

use tracing::warn;

/// Default cache period: 3 days, in seconds.
pub const DEFAULT_CACHE_PERIOD_SECS: u64 = 60 * 60 * 24 * 3;

/// Global configuration for StaticEdge.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteConfig {
    /// Bind address for the server.
    pub gateway_listen: String,
    /// Log level.
    pub log_level: String,
    /// Bucket / container all lookups go against.
    pub bucket: String,
    /// Key prefix under which all lookups are rooted.
    pub prefix: String,
    /// `max-age` value emitted in `Cache-Control`, in seconds.
    pub cache_period_secs: u64,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            gateway_listen: "0.0.0.0:8080".to_owned(),
            log_level: "info".to_owned(),
            bucket: String::new(),
            prefix: "/".to_owned(),
            cache_period_secs: DEFAULT_CACHE_PERIOD_SECS,
        }
    }
}

impl SiteConfig {
    /// Load configuration from environment variables.
    ///
    /// An unparsable `CACHE_PERIOD` keeps the default and logs a warning.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(v) = std::env::var("GATEWAY_LISTEN") {
            config.gateway_listen = v;
        }
        if let Ok(v) = std::env::var("LOG_LEVEL") {
            config.log_level = v;
        }
        if let Ok(v) = std::env::var("BUCKET") {
            config.bucket = v;
        }
        if let Ok(v) = std::env::var("PREFIX") {
            config.prefix = v;
        }
        if let Ok(v) = std::env::var("CACHE_PERIOD") {
            match v.parse::<u64>() {
                Ok(secs) => config.cache_period_secs = secs,
                Err(_) => warn!(value = %v, "invalid CACHE_PERIOD, keeping default"),
            }
        }

        config
    }
}
