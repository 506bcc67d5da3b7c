//! Application configuration loaded from environment variables.

use std::env;
use std::time::Duration;

use geopost_core::proximity::StrategyKind;
use geopost_infra::OpenIdConfig;
use geopost_infra::store::DatabaseConfig;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: Option<DatabaseConfig>,
    /// Header carrying `"<scheme> <token>"`; a deployment-time constant.
    pub auth_header: String,
    pub openid: OpenIdConfig,
    pub proximity: ProximityConfig,
}

#[derive(Debug, Clone)]
pub struct ProximityConfig {
    pub strategy: StrategyKind,
    pub default_radius_km: f64,
    pub scan_timeout: Duration,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let database = env::var("DATABASE_URL").ok().map(|url| DatabaseConfig {
            url,
            max_connections: env::var("DB_MAX_CONNECTIONS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(100),
            min_connections: env::var("DB_MIN_CONNECTIONS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10),
        });

        let openid_defaults = OpenIdConfig::default();
        let audience = env::var("OPENID_AUDIENCE").unwrap_or_default();
        if audience.is_empty() {
            tracing::warn!(
                "OPENID_AUDIENCE is not set; audience checks will reject every token"
            );
        }
        let openid = OpenIdConfig {
            issuer: env::var("OPENID_ISSUER").unwrap_or(openid_defaults.issuer),
            audience,
            jwks_uri: env::var("OPENID_JWKS_URI").unwrap_or(openid_defaults.jwks_uri),
            cache_ttl: Duration::from_secs(
                env::var("JWKS_CACHE_TTL_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(3600),
            ),
        };

        let strategy = match env::var("PROXIMITY_STRATEGY") {
            Ok(raw) => raw.parse().unwrap_or_else(|e| {
                tracing::warn!("{e}; falling back to the exact strategy");
                StrategyKind::Exact
            }),
            Err(_) => StrategyKind::Exact,
        };
        let proximity = ProximityConfig {
            strategy,
            default_radius_km: env::var("DEFAULT_RADIUS_KM")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(0.07),
            scan_timeout: Duration::from_secs(
                env::var("SCAN_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(10),
            ),
        };

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            database,
            auth_header: env::var("AUTH_HEADER")
                .unwrap_or_else(|_| "X-Forwarded-Authorization".to_string()),
            openid,
            proximity,
        }
    }
}
