//! Green Vitality storefront library.
//!
//! Catalog listing, the session-backed shopping cart, and the order hand-off
//! to a messaging channel. Exposed as a library so the binaries and tests can
//! share the cart store and presenter.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalogs;
pub mod config;
pub mod error;
pub mod middleware;
pub mod presenter;
pub mod routes;
pub mod state;
pub mod store;
pub mod submission;
