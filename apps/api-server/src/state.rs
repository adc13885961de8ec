//! Application state - shared across all handlers.

use std::sync::Arc;
use std::time::Duration;

use blog_core::PostGateway;
use blog_core::ports::PostStore;
use blog_infra::InMemoryPostStore;

#[cfg(feature = "mongo")]
use blog_infra::{DatabaseConnections, MongoPostStore};

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: PostGateway,
    /// Which store backs the gateway, reported by the health check.
    pub store_kind: &'static str,
}

impl AppState {
    /// Build the application state with the appropriate store.
    pub async fn new(config: &AppConfig) -> Self {
        #[cfg(feature = "mongo")]
        let (store, store_kind): (Arc<dyn PostStore>, &'static str) = {
            if let Some(db_config) = &config.database {
                match DatabaseConnections::init(db_config).await {
                    Ok(connections) => {
                        (Arc::new(MongoPostStore::new(&connections.main)), "mongodb")
                    }
                    Err(e) => {
                        tracing::error!(
                            "Failed to connect to MongoDB: {}. Using in-memory fallback.",
                            e
                        );
                        (Arc::new(InMemoryPostStore::new()), "memory")
                    }
                }
            } else {
                tracing::warn!("MONGODB_URI not set. Running without database (in-memory mode).");
                (Arc::new(InMemoryPostStore::new()), "memory")
            }
        };

        #[cfg(not(feature = "mongo"))]
        let (store, store_kind): (Arc<dyn PostStore>, &'static str) = {
            tracing::info!("Running without mongo feature - using in-memory store");
            (Arc::new(InMemoryPostStore::new()), "memory")
        };

        tracing::info!(
            store = store_kind,
            timeout_secs = config.store_timeout.as_secs(),
            "Application state initialized"
        );

        Self::with_store(store, store_kind, config.store_timeout)
    }

    /// State over an explicit store.
    pub fn with_store(
        store: Arc<dyn PostStore>,
        store_kind: &'static str,
        timeout: Duration,
    ) -> Self {
        Self {
            posts: PostGateway::new(store).with_timeout(timeout),
            store_kind,
        }
    }
}
