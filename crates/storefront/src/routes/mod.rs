//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Catalog listing
//! GET  /health                 - Health check
//!
//! # Cart (HTMX fragments)
//! GET  /cart                   - Cart page
//! POST /cart/add               - Add to cart (returns count badge, triggers cart-updated)
//! POST /cart/increment         - Increase quantity (returns cart_items fragment)
//! POST /cart/decrement         - Decrease quantity (returns cart_items fragment)
//! POST /cart/remove            - Remove item (returns cart_items fragment)
//! POST /cart/order             - Hand off order summary (HX-Redirect to submission link)
//! GET  /cart/count             - Cart count badge (fragment)
//! ```

pub mod cart;
pub mod catalogs;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/increment", post(cart::increment))
        .route("/decrement", post(cart::decrement))
        .route("/remove", post(cart::remove))
        .route("/order", post(cart::order))
        .route("/count", get(cart::count))
}

/// Create the main application router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(catalogs::index))
        .route("/health", get(health))
        .nest("/cart", cart_routes())
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::io::Write;
    use std::path::PathBuf;

    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use gvcatalogs_core::MINIMUM_ORDER;
    use tower::ServiceExt;

    use super::*;
    use crate::config::StorefrontConfig;
    use crate::middleware::create_session_layer;
    use crate::submission::WhatsAppChannel;

    fn config(catalogs_path: PathBuf) -> StorefrontConfig {
        StorefrontConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            base_url: "http://localhost:3000".to_string(),
            catalogs_path,
            order_channel: WhatsAppChannel::new("919876543210").unwrap(),
            minimum_order: MINIMUM_ORDER,
            sentry_dsn: None,
            sentry_environment: None,
        }
    }

    fn app(catalogs_path: PathBuf) -> Router {
        let config = config(catalogs_path);
        let session_layer = create_session_layer(&config);
        routes()
            .layer(session_layer)
            .with_state(AppState::new(config))
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Option<String>, axum::http::HeaderMap, String) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let cookie = headers
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
            .map(str::to_string);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, cookie, headers, String::from_utf8(bytes.to_vec()).unwrap())
    }

    fn post_form(uri: &str, cookie: Option<&str>, body: &str) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    fn get_with_cookie(uri: &str, cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let app = app(PathBuf::from("missing.json"));
        let (status, _, _, body) = send(&app, get_with_cookie("/health", None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "ok");
    }

    #[tokio::test]
    async fn test_empty_cart_page() {
        let app = app(PathBuf::from("missing.json"));
        let (status, _, _, body) = send(&app, get_with_cookie("/cart", None)).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Your cart is empty."));
        assert!(!body.contains("place-order-btn"));
    }

    #[tokio::test]
    async fn test_cart_flow_through_session() {
        let app = app(PathBuf::from("missing.json"));

        let add = "sku=A1&name=Tea&price=500&image=x.png&catalog=Herbs";
        let (status, cookie, headers, body) = send(&app, post_form("/cart/add", None, add)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers.get("hx-trigger").unwrap(), "cart-updated");
        assert!(body.contains(">1<"));
        let cookie = cookie.expect("session cookie");

        let (_, _, _, body) =
            send(&app, post_form("/cart/add", Some(&cookie), "sku=%20A1&name=Tea&price=500&catalog=Herbs%20")).await;
        assert!(body.contains(">2<"));

        let line = "sku=A1&catalog=Herbs";
        let (_, _, _, body) = send(&app, post_form("/cart/increment", Some(&cookie), line)).await;
        assert!(body.contains("Subtotal: ₹1500.00"));

        let (_, _, _, body) = send(&app, post_form("/cart/decrement", Some(&cookie), line)).await;
        assert!(body.contains("Subtotal: ₹1000.00"));

        let (_, _, _, body) = send(&app, get_with_cookie("/cart/count", Some(&cookie))).await;
        assert!(body.contains(">2<"));

        let (_, _, _, body) = send(&app, post_form("/cart/remove", Some(&cookie), line)).await;
        assert!(body.contains("Your cart is empty."));
    }

    #[tokio::test]
    async fn test_add_rejects_negative_price() {
        let app = app(PathBuf::from("missing.json"));
        let add = "sku=A1&name=Tea&price=-5&catalog=Herbs";
        let (status, _, _, _) = send(&app, post_form("/cart/add", None, add)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_add_rejects_price_above_ceiling_and_cart_still_renders() {
        let app = app(PathBuf::from("missing.json"));
        let (_, cookie, _, _) = send(
            &app,
            post_form("/cart/add", None, "sku=A1&name=Tea&price=500&catalog=Herbs"),
        )
        .await;
        let cookie = cookie.expect("session cookie");

        let huge = "sku=B2&name=Gold&price=40000000000000000000000000000&catalog=Herbs";
        for _ in 0..2 {
            let (status, _, _, _) = send(&app, post_form("/cart/add", Some(&cookie), huge)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
        }

        let (status, _, _, body) = send(&app, get_with_cookie("/cart", Some(&cookie))).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Total: <strong>₹500.00</strong>"));

        let (status, _, _, _) = send(&app, post_form("/cart/order", Some(&cookie), "")).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_order_blocked_below_minimum() {
        let app = app(PathBuf::from("missing.json"));
        let add = "sku=A1&name=Tea&price=500&catalog=Herbs";
        let (_, cookie, _, _) = send(&app, post_form("/cart/add", None, add)).await;

        let (status, _, headers, body) =
            send(&app, post_form("/cart/order", cookie.as_deref(), "")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(headers.get("hx-redirect").is_none());
        assert!(body.contains("disabled"));
    }

    #[tokio::test]
    async fn test_order_redirects_to_submission_link() {
        let app = app(PathBuf::from("missing.json"));
        let add = "sku=B7&name=Oil&price=12000&catalog=Oils";
        let (_, cookie, _, _) = send(&app, post_form("/cart/add", None, add)).await;

        let (status, _, headers, _) =
            send(&app, post_form("/cart/order", cookie.as_deref(), "")).await;
        assert_eq!(status, StatusCode::OK);
        let location = headers.get("hx-redirect").unwrap().to_str().unwrap();
        assert!(location.starts_with("https://wa.me/919876543210?text="));
    }

    #[tokio::test]
    async fn test_catalog_listing() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(
            br#"[
                {"title": "Tulsi", "path": "tulsi.html", "image": "t.jpg", "category": "Herbs", "visible": true},
                {"title": "Secret", "path": "s.html", "image": "s.jpg", "category": "Herbs", "visible": false}
            ]"#,
        )
        .unwrap();

        let app = app(file.path().to_path_buf());
        let (status, _, _, body) = send(&app, get_with_cookie("/", None)).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Tulsi"));
        assert!(!body.contains("Secret"));
    }

    #[tokio::test]
    async fn test_catalog_listing_empty_and_all_hidden() {
        let mut empty = tempfile::NamedTempFile::new().unwrap();
        empty.write_all(b"[]").unwrap();
        let (_, _, _, body) = send(&app(empty.path().to_path_buf()), get_with_cookie("/", None)).await;
        assert!(body.contains("No catalogs available."));

        let mut hidden = tempfile::NamedTempFile::new().unwrap();
        hidden
            .write_all(br#"[{"title": "Secret", "path": "s.html", "image": "s.jpg", "visible": false}]"#)
            .unwrap();
        let (status, _, _, body) = send(&app(hidden.path().to_path_buf()), get_with_cookie("/", None)).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains(r#"<div id="categories-container">"#));
        assert!(!body.contains("No catalogs available."));
        assert!(!body.contains("Secret"));
        assert!(!body.contains("category-section"));
    }

    #[tokio::test]
    async fn test_catalog_listing_error() {
        let app = app(PathBuf::from("/nonexistent/catalogs.json"));
        let (status, _, _, body) = send(&app, get_with_cookie("/", None)).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Error loading catalogs."));
    }
}
