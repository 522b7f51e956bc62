//! Green Vitality Catalogs Core - Shared types library.
//!
//! This crate provides common types used across all catalog components:
//! - `storefront` - Catalog listing, cart page, and order hand-off
//! - `cli` - Command-line cart management
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no
//! persistence, no HTTP. This keeps it lightweight and allows it to be used
//! anywhere.
//!
//! # Modules
//!
//! - [`types`] - Cart keys, line items, the cart itself, catalogs, and money

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;

/// Storage key under which the cart blob is persisted.
pub const CART_STORAGE_KEY: &str = "greenvitality_cart";
