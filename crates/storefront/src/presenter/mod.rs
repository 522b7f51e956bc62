//! Cart presentation.
//!
//! The presenter sits between the cart UI and [`CartStore`]:
//!
//! ```text
//! CartEvent -> CartPresenter::handle -> CartStore mutation -> blob write
//!           -> derive_view_model -> render into Container
//! ```
//!
//! Every event runs that whole pipeline once. Rendering replaces the
//! container contents wholesale.

pub mod summary;
pub mod view;

use askama::Template;
use gvcatalogs_core::{Cart, CartKey, MINIMUM_ORDER};
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{debug, info, instrument};
use url::Url;

use crate::store::{BlobStore, CartStore, StoreError};
use crate::submission::{SubmissionChannel, SubmissionError};

pub use summary::{EMPTY_CART_MESSAGE, format_for_submission};
pub use view::{CartView, CatalogGroup, OrderSummary, derive_view_model};

/// Errors raised while handling a cart event.
#[derive(Debug, Error)]
pub enum PresenterError {
    #[error("cart update failed: {0}")]
    Store(#[from] StoreError),
    #[error("order submission failed: {0}")]
    Submission(#[from] SubmissionError),
    #[error("failed to render cart: {0}")]
    Render(#[from] askama::Error),
}

/// Render target for the cart markup.
pub trait Container {
    /// Replace everything in the container with `html`.
    fn replace_contents(&mut self, html: String);
}

impl Container for String {
    fn replace_contents(&mut self, html: String) {
        *self = html;
    }
}

/// Identifies one cart line from the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineRef {
    pub sku: String,
    pub catalog_name: String,
}

impl LineRef {
    #[must_use]
    pub fn new(sku: impl Into<String>, catalog_name: impl Into<String>) -> Self {
        Self {
            sku: sku.into(),
            catalog_name: catalog_name.into(),
        }
    }
}

/// Interactions offered by the rendered cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartEvent {
    Increment(LineRef),
    /// Decrement; a line at quantity 1 is removed.
    Decrement(LineRef),
    Remove(LineRef),
    PlaceOrder,
}

/// What handling an event produced, besides the re-render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventOutcome {
    /// The cart was updated (or left alone) and re-rendered.
    Rendered,
    /// The order summary was handed off; open this link.
    Submitted(Url),
    /// An order was requested below the minimum. Nothing was submitted.
    SubmitBlocked,
}

/// Cart items fragment template.
#[derive(Template)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub cart: CartView,
}

/// Render `cart` into `container`.
///
/// An empty cart renders only the empty-state message.
///
/// # Errors
///
/// Returns `PresenterError::Render` if the template fails to render.
pub fn render(
    container: &mut impl Container,
    cart: &Cart,
    minimum_order: Decimal,
) -> Result<OrderSummary, PresenterError> {
    let summary = derive_view_model(cart, minimum_order);
    let html = CartItemsTemplate {
        cart: CartView::from(&summary),
    }
    .render()?;
    container.replace_contents(html);
    Ok(summary)
}

/// Drives the cart UI.
#[derive(Debug)]
pub struct CartPresenter<S, C> {
    store: CartStore<S>,
    channel: C,
    minimum_order: Decimal,
}

impl<S: BlobStore, C: SubmissionChannel> CartPresenter<S, C> {
    /// Create a presenter using the standard minimum order.
    #[must_use]
    pub const fn new(store: CartStore<S>, channel: C) -> Self {
        Self {
            store,
            channel,
            minimum_order: MINIMUM_ORDER,
        }
    }

    /// Override the minimum order value.
    #[must_use]
    pub const fn with_minimum_order(mut self, minimum_order: Decimal) -> Self {
        self.minimum_order = minimum_order;
        self
    }

    #[must_use]
    pub const fn store(&self) -> &CartStore<S> {
        &self.store
    }

    pub const fn store_mut(&mut self) -> &mut CartStore<S> {
        &mut self.store
    }

    /// Consume the presenter, returning the cart store.
    #[must_use]
    pub fn into_store(self) -> CartStore<S> {
        self.store
    }

    #[must_use]
    pub const fn minimum_order(&self) -> Decimal {
        self.minimum_order
    }

    /// Current order summary.
    #[must_use]
    pub fn view_model(&self) -> OrderSummary {
        derive_view_model(&self.store.contents(), self.minimum_order)
    }

    /// Render the current cart into `container`.
    ///
    /// # Errors
    ///
    /// Returns `PresenterError::Render` if the template fails to render.
    pub fn refresh(&self, container: &mut impl Container) -> Result<OrderSummary, PresenterError> {
        render(container, &self.store.contents(), self.minimum_order)
    }

    /// Apply `event`, then re-render into `container`.
    ///
    /// # Errors
    ///
    /// Returns `PresenterError` if the cart cannot be updated, the order
    /// link cannot be built, or the template fails to render. The container
    /// is left untouched on error.
    #[instrument(skip(self, container))]
    pub fn handle(
        &mut self,
        event: CartEvent,
        container: &mut impl Container,
    ) -> Result<EventOutcome, PresenterError> {
        let outcome = self.apply(event)?;
        self.refresh(container)?;
        Ok(outcome)
    }

    fn apply(&mut self, event: CartEvent) -> Result<EventOutcome, PresenterError> {
        match event {
            CartEvent::Increment(line) => {
                if let Some(quantity) = self.quantity_of(&line) {
                    self.store.set_quantity(
                        &line.sku,
                        &line.catalog_name,
                        i64::from(quantity) + 1,
                    )?;
                }
                Ok(EventOutcome::Rendered)
            }
            CartEvent::Decrement(line) => {
                match self.quantity_of(&line) {
                    Some(quantity) if quantity > 1 => self.store.set_quantity(
                        &line.sku,
                        &line.catalog_name,
                        i64::from(quantity) - 1,
                    )?,
                    Some(_) => self.store.remove_item(&line.sku, &line.catalog_name)?,
                    None => {}
                }
                Ok(EventOutcome::Rendered)
            }
            CartEvent::Remove(line) => {
                self.store.remove_item(&line.sku, &line.catalog_name)?;
                Ok(EventOutcome::Rendered)
            }
            CartEvent::PlaceOrder => self.place_order(),
        }
    }

    fn place_order(&self) -> Result<EventOutcome, PresenterError> {
        let cart = self.store.contents();
        let summary = derive_view_model(&cart, self.minimum_order);
        if cart.is_empty() || !summary.can_submit() {
            debug!(total = %summary.total, minimum = %self.minimum_order, "Order below minimum, not submitting");
            return Ok(EventOutcome::SubmitBlocked);
        }

        let link = self.channel.open(&format_for_submission(&cart))?;
        info!(
            total = %summary.total,
            lines = cart.len(),
            "Order summary handed to submission channel"
        );
        Ok(EventOutcome::Submitted(link))
    }

    fn quantity_of(&self, line: &LineRef) -> Option<u32> {
        let key = CartKey::new(&line.catalog_name, &line.sku);
        self.store.contents().get(&key).map(|item| item.quantity)
    }
}
