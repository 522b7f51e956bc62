//! Catalog listing page.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use gvcatalogs_core::{CART_STORAGE_KEY, Cart};
use tower_sessions::Session;
use tracing::instrument;

use crate::catalogs::{CatalogError, CategoryGroup, group_by_category, parse_catalogs};
use crate::state::AppState;

/// Catalog listing template.
#[derive(Template, WebTemplate)]
#[template(path = "catalogs/index.html")]
pub struct CatalogIndexTemplate {
    pub groups: Vec<CategoryGroup>,
    pub load_failed: bool,
    /// The catalog file lists no catalogs at all. A list whose catalogs are
    /// all hidden renders an empty container instead.
    pub no_catalogs: bool,
    pub cart_count: u64,
}

/// Display the catalog listing.
///
/// The catalog file is read on every request so edits show up without a
/// restart.
#[instrument(skip(state, session))]
pub async fn index(State(state): State<AppState>, session: Session) -> CatalogIndexTemplate {
    let (groups, load_failed, no_catalogs) = match read_catalogs(&state).await {
        Ok(catalogs) => (group_by_category(&catalogs), false, catalogs.is_empty()),
        Err(e) => {
            tracing::error!(
                path = %state.config().catalogs_path.display(),
                "Error fetching catalogs: {e}"
            );
            (Vec::new(), true, false)
        }
    };

    CatalogIndexTemplate {
        groups,
        load_failed,
        no_catalogs,
        cart_count: session_item_count(&session).await,
    }
}

async fn read_catalogs(state: &AppState) -> Result<Vec<gvcatalogs_core::Catalog>, CatalogError> {
    let contents = tokio::fs::read_to_string(&state.config().catalogs_path).await?;
    parse_catalogs(&contents)
}

/// Item count for the header badge; unreadable carts count as empty.
async fn session_item_count(session: &Session) -> u64 {
    session
        .get::<String>(CART_STORAGE_KEY)
        .await
        .ok()
        .flatten()
        .and_then(|blob| Cart::from_json(&blob).ok())
        .map_or(0, |cart| cart.item_count())
}
