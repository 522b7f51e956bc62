//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_BASE_URL` - Public URL for the storefront (default: <http://localhost:3000>)
//! - `STOREFRONT_CATALOGS_PATH` - Catalog list JSON (default: catalogs.json)
//! - `ORDER_WHATSAPP_NUMBER` - Phone number orders are sent to (default: none, customer picks)
//! - `MINIMUM_ORDER` - Minimum cart value for ordering (default: 12000)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use gvcatalogs_core::MINIMUM_ORDER;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::submission::WhatsAppChannel;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// Path to the catalog list JSON
    pub catalogs_path: PathBuf,
    /// Order submission channel
    pub order_channel: WhatsAppChannel,
    /// Minimum cart value required to place an order
    pub minimum_order: Decimal,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("STOREFRONT_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_HOST".to_string(), e.to_string())
            })?;
        let port = get_env_or_default("STOREFRONT_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_PORT".to_string(), e.to_string())
            })?;
        let base_url = get_env_or_default("STOREFRONT_BASE_URL", "http://localhost:3000");
        let catalogs_path =
            PathBuf::from(get_env_or_default("STOREFRONT_CATALOGS_PATH", "catalogs.json"));
        let order_channel = parse_order_channel(get_optional_env("ORDER_WHATSAPP_NUMBER"))?;
        let minimum_order = parse_minimum_order(get_optional_env("MINIMUM_ORDER"))?;

        Ok(Self {
            host,
            port,
            base_url,
            catalogs_path,
            order_channel,
            minimum_order,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable, treating blank values as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

fn parse_order_channel(phone: Option<String>) -> Result<WhatsAppChannel, ConfigError> {
    phone.map_or_else(
        || Ok(WhatsAppChannel::unaddressed()),
        |phone| {
            WhatsAppChannel::new(&phone).map_err(|e| {
                ConfigError::InvalidEnvVar("ORDER_WHATSAPP_NUMBER".to_string(), e.to_string())
            })
        },
    )
}

fn parse_minimum_order(value: Option<String>) -> Result<Decimal, ConfigError> {
    let Some(value) = value else {
        return Ok(MINIMUM_ORDER);
    };
    let amount = value.trim().parse::<Decimal>().map_err(|e| {
        ConfigError::InvalidEnvVar("MINIMUM_ORDER".to_string(), e.to_string())
    })?;
    if amount.is_sign_negative() {
        return Err(ConfigError::InvalidEnvVar(
            "MINIMUM_ORDER".to_string(),
            "must not be negative".to_string(),
        ));
    }
    Ok(amount)
}
