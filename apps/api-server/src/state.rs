//! Application state - shared across all handlers.

use std::sync::Arc;
use std::time::Duration;

use geopost_core::ports::{PostStore, TokenVerifier};
use geopost_core::proximity::ProximityStrategy;
use geopost_infra::OpenIdVerifier;
use geopost_infra::store::{MemoryPostStore, PostgresPostStore};

use crate::config::AppConfig;

/// Shared application state; built once at startup and cloned into
/// every worker, never recreated per request.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn PostStore>,
    pub verifier: Arc<dyn TokenVerifier>,
    pub proximity: Arc<dyn ProximityStrategy>,
    pub auth_header: String,
    pub default_radius_km: f64,
    pub scan_timeout: Duration,
}

impl AppState {
    /// Build the application state with the configured implementations.
    pub async fn new(config: &AppConfig) -> Self {
        let store: Arc<dyn PostStore> = match &config.database {
            Some(db_config) => match PostgresPostStore::connect(db_config).await {
                Ok(store) => Arc::new(store),
                Err(e) => {
                    tracing::error!(
                        "failed to connect to the database: {e}. Using the in-memory fallback."
                    );
                    Arc::new(MemoryPostStore::new())
                }
            },
            None => {
                tracing::warn!("DATABASE_URL not set. Running with the in-memory store.");
                Arc::new(MemoryPostStore::new())
            }
        };

        let verifier: Arc<dyn TokenVerifier> =
            Arc::new(OpenIdVerifier::new(config.openid.clone()));

        tracing::info!(strategy = ?config.proximity.strategy, "application state initialized");

        Self {
            store,
            verifier,
            proximity: config.proximity.strategy.build(),
            auth_header: config.auth_header.clone(),
            default_radius_km: config.proximity.default_radius_km,
            scan_timeout: config.proximity.scan_timeout,
        }
    }
}
