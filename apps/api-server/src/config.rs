//! Application configuration loaded from environment variables.

use std::env;
use std::time::Duration;

use blog_core::service::DEFAULT_OPERATION_TIMEOUT;
use blog_infra::database::DatabaseConfig;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// `None` runs the server over the in-memory store.
    #[cfg_attr(not(feature = "mongo"), allow(dead_code))]
    pub database: Option<DatabaseConfig>,
    /// Upper bound for every store operation.
    pub store_timeout: Duration,
    /// Emit JSON log lines instead of pretty ones.
    pub json_logs: bool,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Self {
        let database = var("MONGODB_URI")
            .filter(|uri| !uri.is_empty())
            .map(|uri| {
                let name = var("MONGODB_DB")
                    .filter(|db| !db.is_empty())
                    .unwrap_or_else(|| "blog".to_string());
                let mut config = DatabaseConfig::new(uri, name);
                let pool = var("MONGODB_MAX_POOL_SIZE").and_then(|s| s.parse::<u32>().ok());
                if let Some(pool) = pool {
                    config.max_pool_size = pool;
                }
                config
            });

        Self {
            host: var("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: var("PORT").and_then(|p| p.parse().ok()).unwrap_or(8080),
            database,
            store_timeout: var("STORE_TIMEOUT_SECS")
                .and_then(|s| s.parse::<u64>().ok())
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_OPERATION_TIMEOUT),
            json_logs: var("LOG_FORMAT")
                .map(|v| v.eq_ignore_ascii_case("json"))
                .unwrap_or(false),
        }
    }
}
