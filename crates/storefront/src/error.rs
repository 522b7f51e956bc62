//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers should return `Result<T, AppError>`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use gvcatalogs_core::CartError;
use thiserror::Error;

use crate::presenter::PresenterError;
use crate::store::StoreError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Cart update, hand-off, or rendering failed.
    #[error("Cart error: {0}")]
    Presenter(#[from] PresenterError),

    /// Session storage failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Cart(cart) => Self::from(cart),
            other => Self::Presenter(PresenterError::Store(other)),
        }
    }
}

impl From<CartError> for AppError {
    fn from(err: CartError) -> Self {
        Self::BadRequest(err.to_string())
    }
}

impl AppError {
    const fn status(&self) -> StatusCode {
        match self {
            Self::Presenter(PresenterError::Submission(_)) => StatusCode::BAD_GATEWAY,
            Self::Presenter(_) | Self::Session(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Capture server errors to Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        // Don't expose internal error details to clients
        let message = match &self {
            Self::BadRequest(_) => self.to_string(),
            Self::Presenter(PresenterError::Submission(_)) => {
                "Could not prepare your order message".to_string()
            }
            _ => "Internal server error".to_string(),
        };

        (status, message).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StorageError;
    use crate::submission::SubmissionError;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::BadRequest("invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: invalid input");
    }

    #[test]
    fn test_invalid_product_is_bad_request() {
        let err = AppError::from(StoreError::Cart(CartError::EmptySku));
        assert!(matches!(err, AppError::BadRequest(_)));
        assert_eq!(get_status(err), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            get_status(AppError::from(StoreError::Storage(StorageError::InvalidKey(
                "k".to_string()
            )))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            get_status(AppError::Presenter(PresenterError::Submission(
                SubmissionError::InvalidPhone("x".to_string())
            ))),
            StatusCode::BAD_GATEWAY
        );
    }
}
