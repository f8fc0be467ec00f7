//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server-side errors to
//! Sentry before responding to the client. All route handlers should return
//! `Result<T, AppError>`. The status mapping is fixed: `unauthenticated` is
//! 401, `forbidden` 403, `not_found` 404, the order/account domain errors
//! (`product_not_found`, `invalid_quantity`, `invalid_status`,
//! `last_admin_protected`) 400, and anything unexpected 500.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::github::GithubError;
use crate::policy::PolicyError;
use crate::pricing::PricingError;
use crate::services::{AccountError, AuthError, OrderError};
use crate::store::StoreError;

/// Application-level error type for the API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Order operation failed.
    #[error("order error: {0}")]
    Order(#[from] OrderError),

    /// Profile operation failed.
    #[error("account error: {0}")]
    Account(#[from] AccountError),

    /// Login failed.
    #[error("auth error: {0}")]
    Auth(#[from] AuthError),

    /// Authorization denied outside a service call.
    #[error("policy error: {0}")]
    Policy(#[from] PolicyError),

    /// GitHub collaborator failed outside a service call.
    #[error("github error: {0}")]
    Github(#[from] GithubError),

    /// Store operation failed outside a service call.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Session read/write failed.
    #[error("session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Resource not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// The request named a status outside the order status enumeration.
    #[error("invalid status: {0}")]
    InvalidStatus(String),

    /// Bad request from client.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

/// JSON body returned for every error response.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

/// Stable machine-readable error kinds.
mod kind {
    pub const UNAUTHENTICATED: &str = "unauthenticated";
    pub const FORBIDDEN: &str = "forbidden";
    pub const NOT_FOUND: &str = "not_found";
    pub const PRODUCT_NOT_FOUND: &str = "product_not_found";
    pub const INVALID_QUANTITY: &str = "invalid_quantity";
    pub const INVALID_STATUS: &str = "invalid_status";
    pub const LAST_ADMIN_PROTECTED: &str = "last_admin_protected";
    pub const BAD_REQUEST: &str = "bad_request";
    pub const BAD_GATEWAY: &str = "bad_gateway";
    pub const INTERNAL: &str = "internal";
}

const fn classify_policy(err: &PolicyError) -> (StatusCode, &'static str) {
    match err {
        PolicyError::Unauthenticated => (StatusCode::UNAUTHORIZED, kind::UNAUTHENTICATED),
        PolicyError::Forbidden => (StatusCode::FORBIDDEN, kind::FORBIDDEN),
    }
}

const fn classify_pricing(err: &PricingError) -> (StatusCode, &'static str) {
    match err {
        PricingError::EmptyOrder => (StatusCode::BAD_REQUEST, kind::BAD_REQUEST),
        PricingError::ProductNotFound(_) => (StatusCode::BAD_REQUEST, kind::PRODUCT_NOT_FOUND),
        PricingError::InvalidQuantity { .. } => (StatusCode::BAD_REQUEST, kind::INVALID_QUANTITY),
        PricingError::Store(_) => (StatusCode::INTERNAL_SERVER_ERROR, kind::INTERNAL),
    }
}

impl AppError {
    /// The response status and machine-readable kind for this error.
    #[must_use]
    fn classify(&self) -> (StatusCode, &'static str) {
        match self {
            Self::Order(err) => match err {
                OrderError::Policy(policy) => classify_policy(policy),
                OrderError::Pricing(pricing) => classify_pricing(pricing),
                OrderError::NotFound => (StatusCode::NOT_FOUND, kind::NOT_FOUND),
                OrderError::InvalidStatus { .. } => (StatusCode::BAD_REQUEST, kind::INVALID_STATUS),
                OrderError::Store(_) => (StatusCode::INTERNAL_SERVER_ERROR, kind::INTERNAL),
            },
            Self::Account(err) => match err {
                AccountError::Policy(policy) => classify_policy(policy),
                AccountError::NotFound => (StatusCode::NOT_FOUND, kind::NOT_FOUND),
                AccountError::RoleChangeForbidden => (StatusCode::FORBIDDEN, kind::FORBIDDEN),
                AccountError::LastAdminProtected => {
                    (StatusCode::BAD_REQUEST, kind::LAST_ADMIN_PROTECTED)
                }
                AccountError::Store(_) => (StatusCode::INTERNAL_SERVER_ERROR, kind::INTERNAL),
            },
            Self::Auth(err) => match err {
                AuthError::MissingEmail | AuthError::InvalidEmail(_) => {
                    (StatusCode::BAD_REQUEST, kind::BAD_REQUEST)
                }
                AuthError::Github(GithubError::Exchange(_)) => {
                    (StatusCode::BAD_REQUEST, kind::BAD_REQUEST)
                }
                AuthError::Github(GithubError::Http(_)) => {
                    (StatusCode::BAD_GATEWAY, kind::BAD_GATEWAY)
                }
                AuthError::Store(_) => (StatusCode::INTERNAL_SERVER_ERROR, kind::INTERNAL),
            },
            Self::Policy(policy) => classify_policy(policy),
            Self::Github(GithubError::Exchange(_)) => (StatusCode::BAD_REQUEST, kind::BAD_REQUEST),
            Self::Github(GithubError::Http(_)) => (StatusCode::BAD_GATEWAY, kind::BAD_GATEWAY),
            Self::NotFound(_) => (StatusCode::NOT_FOUND, kind::NOT_FOUND),
            Self::InvalidStatus(_) => (StatusCode::BAD_REQUEST, kind::INVALID_STATUS),
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, kind::BAD_REQUEST),
            Self::Store(_) | Self::Session(_) | Self::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, kind::INTERNAL)
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = self.classify();

        // Capture server-side failures to Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        // Don't expose internal error details to clients
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            "Internal server error".to_string()
        } else if status == StatusCode::BAD_GATEWAY {
            "External service error".to_string()
        } else {
            self.to_string()
        };

        (status, Json(ErrorBody { error, message })).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    use clementine_core::{OrderStatus, ProductId};

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_policy_errors_map_to_auth_statuses() {
        assert_eq!(
            get_status(AppError::Policy(PolicyError::Unauthenticated)),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AppError::Policy(PolicyError::Forbidden)),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn test_domain_errors_map_to_bad_request() {
        assert_eq!(
            get_status(AppError::Order(OrderError::Pricing(
                PricingError::ProductNotFound(ProductId::new())
            ))),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Order(OrderError::Pricing(
                PricingError::InvalidQuantity {
                    product_id: ProductId::new(),
                    quantity: 0,
                }
            ))),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Order(OrderError::InvalidStatus {
                from: OrderStatus::Pending,
                to: OrderStatus::Shipped,
            })),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Account(AccountError::LastAdminProtected)),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::InvalidStatus("refunded".to_owned())),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_not_found_and_internal() {
        assert_eq!(
            get_status(AppError::Order(OrderError::NotFound)),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Account(AccountError::NotFound)),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Store(StoreError::Backend("boom".to_owned()))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            get_status(AppError::Internal("boom".to_owned())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_role_change_is_forbidden() {
        assert_eq!(
            get_status(AppError::Account(AccountError::RoleChangeForbidden)),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn test_internal_details_are_not_exposed() {
        let response =
            AppError::Store(StoreError::Backend("connection string leaked".to_owned()))
                .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        // Body is the generic message; the backend detail must not appear.
        // (Serialized body inspection happens in the HTTP smoke tests.)
    }
}
