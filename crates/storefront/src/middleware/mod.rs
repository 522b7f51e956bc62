//! HTTP middleware for storefront.

pub mod session;

pub use session::create_session_layer;
