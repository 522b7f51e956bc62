//! Session middleware configuration.
//!
//! Each visitor's cart blob is kept in their session, so the session store is
//! the per-client persistence medium. Sessions are held in memory.

use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use crate::config::StorefrontConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "gv_session";

/// Session expiry time in seconds (30 days).
const SESSION_EXPIRY_SECONDS: i64 = 30 * 24 * 60 * 60;

/// Create the session layer with an in-memory store.
///
/// # Arguments
///
/// * `config` - Storefront configuration (for the secure-cookie decision)
#[must_use]
pub fn create_session_layer(config: &StorefrontConfig) -> SessionManagerLayer<MemoryStore> {
    // Determine if we're in production (HTTPS)
    let is_secure = config.base_url.starts_with("https://");

    SessionManagerLayer::new(MemoryStore::default())
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(is_secure)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}
