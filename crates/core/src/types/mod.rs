//! Core types for Green Vitality catalogs.
//!
//! This module provides the cart data model and catalog descriptors.

pub mod cart;
pub mod catalog;
pub mod key;
pub mod price;

pub use cart::{Cart, CartError, LineItem, MAX_LINE_QUANTITY, MAX_UNIT_PRICE, Product};
pub use catalog::{Catalog, UNCATEGORIZED, UNKNOWN_CATALOG};
pub use key::{CartKey, KEY_SEPARATOR, normalize_identifier};
pub use price::{CURRENCY_SYMBOL, MINIMUM_ORDER, format_money};
