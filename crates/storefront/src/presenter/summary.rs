//! Plain-text order summary handed to the submission channel.

use std::fmt::Write;

use gvcatalogs_core::{Cart, format_money};

use super::view::display_catalog_name;

/// Text returned for an empty cart.
pub const EMPTY_CART_MESSAGE: &str = "Your cart is empty.";

/// Opening line of every order summary.
pub const ORDER_GREETING: &str = "Hello! I would like to place the following order:";

/// Format `cart` as a multi-line order message.
///
/// Lines are listed in cart order, followed by the order total:
///
/// ```text
/// Hello! I would like to place the following order:
///
/// SKU: A1
/// Catalog: Herbs
/// Product: Tea
/// Quantity: 3
///
/// Total Order Value: ₹1500.00
/// ```
#[must_use]
pub fn format_for_submission(cart: &Cart) -> String {
    if cart.is_empty() {
        return EMPTY_CART_MESSAGE.to_string();
    }

    let mut message = String::new();
    let _ = writeln!(message, "{ORDER_GREETING}");
    message.push('\n');

    for item in cart.items() {
        let _ = writeln!(message, "SKU: {}", item.sku);
        let _ = writeln!(message, "Catalog: {}", display_catalog_name(item));
        let _ = writeln!(message, "Product: {}", item.name);
        let _ = writeln!(message, "Quantity: {}", item.quantity);
        message.push('\n');
    }

    let _ = write!(message, "Total Order Value: {}", format_money(cart.total()));
    message
}
