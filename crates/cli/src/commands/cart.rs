//! Cart commands operating on a file-backed cart.
//!
//! # Usage
//!
//! ```bash
//! # Add one unit of a product
//! gv-cli cart add --sku A1 --name "Tulsi Tea" --price 500 --catalog Herbs
//!
//! # Set a line's quantity (0 or less removes it)
//! gv-cli cart set --sku A1 --catalog Herbs --quantity 3
//!
//! # Remove a line
//! gv-cli cart remove --sku A1 --catalog Herbs
//!
//! # Show the cart grouped by catalog
//! gv-cli cart show
//!
//! # Print the order hand-off link
//! gv-cli cart order --phone 919876543210
//! ```
//!
//! # Environment Variables
//!
//! - `GV_CART_DIR` - Directory holding the cart blob (default: `.gvcatalogs`)
//! - `MINIMUM_ORDER` - Minimum order value for every `cart` action (default: 12000)

use std::fmt::Write as _;

use gvcatalogs_core::Product;
use gvcatalogs_storefront::presenter::{
    CartEvent, CartPresenter, CartView, EMPTY_CART_MESSAGE, EventOutcome, PresenterError,
    format_for_submission,
};
use gvcatalogs_storefront::store::{BlobStore, CartStore, StoreError};
use gvcatalogs_storefront::submission::{SubmissionError, WhatsAppChannel};
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur during cart commands.
#[derive(Debug, Error)]
pub enum CartCommandError {
    /// Cart update failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Order hand-off failed.
    #[error(transparent)]
    Presenter(#[from] PresenterError),

    /// Phone number was rejected.
    #[error(transparent)]
    Submission(#[from] SubmissionError),

    /// The order does not meet the minimum.
    #[error("Order not placed: {0}")]
    OrderBlocked(String),
}

/// Add one unit of a product to the cart.
///
/// # Errors
///
/// Returns `CartCommandError::Store` if the product is invalid or the cart
/// cannot be written.
pub fn add<S: BlobStore>(
    store: &mut CartStore<S>,
    product: &Product,
    catalog: &str,
) -> Result<String, CartCommandError> {
    store.add_item(product, catalog)?;
    let cart = store.contents();
    tracing::info!(sku = %product.sku, catalog, "Added to cart");
    Ok(format!(
        "Added {} ({} items in cart)",
        product.name.trim(),
        cart.item_count()
    ))
}

/// Set the quantity of a line already in the cart.
///
/// # Errors
///
/// Returns `CartCommandError::Store` if the cart cannot be written.
pub fn set<S: BlobStore>(
    store: &mut CartStore<S>,
    sku: &str,
    catalog: &str,
    quantity: i64,
    minimum_order: Decimal,
) -> Result<String, CartCommandError> {
    store.set_quantity(sku, catalog, quantity)?;
    show(store, minimum_order)
}

/// Remove a line from the cart.
///
/// # Errors
///
/// Returns `CartCommandError::Store` if the cart cannot be written.
pub fn remove<S: BlobStore>(
    store: &mut CartStore<S>,
    sku: &str,
    catalog: &str,
    minimum_order: Decimal,
) -> Result<String, CartCommandError> {
    store.remove_item(sku, catalog)?;
    show(store, minimum_order)
}

/// Render the cart as plain text, grouped by catalog.
///
/// # Errors
///
/// Infallible today; returns `Result` to match the other commands.
pub fn show<S: BlobStore>(
    store: &CartStore<S>,
    minimum_order: Decimal,
) -> Result<String, CartCommandError> {
    let view = CartView::from(&gvcatalogs_storefront::presenter::derive_view_model(
        &store.contents(),
        minimum_order,
    ));
    Ok(render_text(&view))
}

/// Print the order summary and its hand-off link.
///
/// # Errors
///
/// Returns `CartCommandError::OrderBlocked` if the cart is empty or below the
/// minimum, or `CartCommandError::Submission` for an invalid phone number.
pub fn order<S: BlobStore>(
    store: CartStore<S>,
    phone: Option<&str>,
    minimum_order: Decimal,
) -> Result<String, CartCommandError> {
    let channel = match phone {
        Some(phone) => WhatsAppChannel::new(phone)?,
        None => WhatsAppChannel::unaddressed(),
    };
    let mut presenter = CartPresenter::new(store, channel).with_minimum_order(minimum_order);

    let mut rendered = String::new();
    match presenter.handle(CartEvent::PlaceOrder, &mut rendered)? {
        EventOutcome::Submitted(link) => {
            let summary = format_for_submission(&presenter.store().contents());
            Ok(format!("{summary}\n\n{link}"))
        }
        EventOutcome::SubmitBlocked | EventOutcome::Rendered => {
            let view = CartView::from(&presenter.view_model());
            let reason = if view.is_empty {
                EMPTY_CART_MESSAGE.to_string()
            } else {
                view.status_message
            };
            Err(CartCommandError::OrderBlocked(reason))
        }
    }
}

fn render_text(view: &CartView) -> String {
    if view.is_empty {
        return EMPTY_CART_MESSAGE.to_string();
    }

    let mut out = String::new();
    for group in &view.groups {
        let _ = writeln!(out, "{}", group.name);
        for item in &group.items {
            let _ = writeln!(
                out,
                "  {} {} x{} @ {} = {}",
                item.sku, item.name, item.quantity, item.price, item.line_price
            );
        }
    }
    let _ = writeln!(out, "Total: {}", view.total);
    let _ = write!(out, "{}", view.status_message);
    out
}
