//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! The cart blob is stored in the session: each request loads it into a
//! [`MemoryBlobStore`], runs the [`CartPresenter`], and writes the blob back
//! to the session if it changed.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{AppendHeaders, Html, IntoResponse, Response},
};
use gvcatalogs_core::{CART_STORAGE_KEY, Product};
use rust_decimal::Decimal;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::Result;
use crate::presenter::{CartEvent, CartPresenter, CartView, EventOutcome, LineRef};
use crate::state::AppState;
use crate::store::{CartStore, MemoryBlobStore};
use crate::submission::WhatsAppChannel;

type SessionPresenter = CartPresenter<MemoryBlobStore, WhatsAppChannel>;

// =============================================================================
// Session Helpers
// =============================================================================

/// A request-scoped cart loaded from the session.
struct SessionCart {
    presenter: SessionPresenter,
    original: Option<String>,
}

impl SessionCart {
    /// Load the cart blob from the session.
    async fn load(state: &AppState, session: &Session) -> Result<Self> {
        let original = session.get::<String>(CART_STORAGE_KEY).await?;
        let storage = original.as_ref().map_or_else(MemoryBlobStore::new, |blob| {
            MemoryBlobStore::with_blob(CART_STORAGE_KEY, blob.clone())
        });
        let presenter = CartPresenter::new(
            CartStore::new(storage),
            state.config().order_channel.clone(),
        )
        .with_minimum_order(state.config().minimum_order);

        Ok(Self {
            presenter,
            original,
        })
    }

    /// Write the cart blob back to the session if it changed.
    async fn save(self, session: &Session) -> Result<()> {
        let mut storage = self.presenter.into_store().into_storage();
        let current = storage.take(CART_STORAGE_KEY);
        if current != self.original {
            if let Some(blob) = current {
                session.insert(CART_STORAGE_KEY, blob).await?;
            }
        }
        Ok(())
    }
}

fn item_count(presenter: &SessionPresenter) -> u64 {
    presenter.store().contents().item_count()
}

// =============================================================================
// Forms & Templates
// =============================================================================

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub sku: String,
    pub name: String,
    pub price: Decimal,
    #[serde(default)]
    pub image: String,
    pub catalog: String,
}

/// Form identifying one cart line.
#[derive(Debug, Deserialize)]
pub struct CartLineForm {
    pub sku: String,
    pub catalog: String,
}

impl From<CartLineForm> for LineRef {
    fn from(form: CartLineForm) -> Self {
        Self::new(form.sku, form.catalog)
    }
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub cart: CartView,
    pub cart_count: u64,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u64,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display cart page.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> Result<Response> {
    let cart = SessionCart::load(&state, &session).await?;
    let summary = cart.presenter.view_model();

    Ok(CartShowTemplate {
        cart: CartView::from(&summary),
        cart_count: summary.item_count,
    }
    .into_response())
}

/// Add item to cart (HTMX).
///
/// Returns the updated count badge with an HTMX trigger so other elements
/// can refresh.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<AddToCartForm>,
) -> Result<Response> {
    let mut cart = SessionCart::load(&state, &session).await?;
    let product = Product::new(form.sku, form.name, form.price, form.image);
    cart.presenter.store_mut().add_item(&product, &form.catalog)?;

    let count = item_count(&cart.presenter);
    cart.save(&session).await?;

    Ok((
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartCountTemplate { count },
    )
        .into_response())
}

/// Increase a line's quantity by one (HTMX).
#[instrument(skip(state, session))]
pub async fn increment(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<CartLineForm>,
) -> Result<Response> {
    apply(&state, &session, CartEvent::Increment(form.into())).await
}

/// Decrease a line's quantity by one, removing it at zero (HTMX).
#[instrument(skip(state, session))]
pub async fn decrement(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<CartLineForm>,
) -> Result<Response> {
    apply(&state, &session, CartEvent::Decrement(form.into())).await
}

/// Remove a line from the cart (HTMX).
#[instrument(skip(state, session))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<CartLineForm>,
) -> Result<Response> {
    apply(&state, &session, CartEvent::Remove(form.into())).await
}

/// Hand the order summary off to the submission channel (HTMX).
///
/// Responds with an `HX-Redirect` to the submission link, or just the
/// re-rendered cart when the order is below the minimum.
#[instrument(skip(state, session))]
pub async fn order(State(state): State<AppState>, session: Session) -> Result<Response> {
    apply(&state, &session, CartEvent::PlaceOrder).await
}

/// Get cart count badge (HTMX).
#[instrument(skip(state, session))]
pub async fn count(State(state): State<AppState>, session: Session) -> Result<Response> {
    let cart = SessionCart::load(&state, &session).await?;
    Ok(CartCountTemplate {
        count: item_count(&cart.presenter),
    }
    .into_response())
}

/// Run one cart event and respond with the re-rendered items fragment.
async fn apply(state: &AppState, session: &Session, event: CartEvent) -> Result<Response> {
    let mut cart = SessionCart::load(state, session).await?;
    let mut html = String::new();
    let outcome = cart.presenter.handle(event, &mut html)?;
    cart.save(session).await?;

    let response = match outcome {
        EventOutcome::Submitted(link) => (
            AppendHeaders([("HX-Redirect", link.to_string())]),
            Html(html),
        )
            .into_response(),
        EventOutcome::SubmitBlocked => Html(html).into_response(),
        EventOutcome::Rendered => (
            AppendHeaders([("HX-Trigger", "cart-updated".to_string())]),
            Html(html),
        )
            .into_response(),
    };
    Ok(response)
}
