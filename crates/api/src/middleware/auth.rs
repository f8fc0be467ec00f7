//! Authentication extractors.
//!
//! Extractors that turn the session into an explicit
//! [`Principal`](crate::models::Principal) handed to route handlers. Core
//! logic never reads identity from anywhere else.

use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use serde_json::json;
use tower_sessions::Session;

use crate::models::{Principal, session_keys};

/// Extractor that requires an authenticated principal.
///
/// Rejects with a 401 JSON response when there is no session or no logged-in
/// principal.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth(principal): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", principal.id)
/// }
/// ```
pub struct RequireAuth(pub Principal);

/// Rejection returned when authentication is required but absent.
pub struct AuthRejection;

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "error": "unauthenticated",
                "message": "authentication required",
            })),
        )
            .into_response()
    }
}

impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Get the session from extensions (set by SessionManagerLayer)
        let session = parts.extensions.get::<Session>().ok_or(AuthRejection)?;

        // Get the current principal from the session
        let principal: Principal = session
            .get(session_keys::CURRENT_PRINCIPAL)
            .await
            .ok()
            .flatten()
            .ok_or(AuthRejection)?;

        Ok(Self(principal))
    }
}

/// Extractor that optionally gets the current principal.
///
/// Unlike `RequireAuth`, this never rejects; handlers pass the option
/// straight to the services, which own the authorization decision.
pub struct OptionalAuth(pub Option<Principal>);

impl<S> FromRequestParts<S> for OptionalAuth
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let principal = match parts.extensions.get::<Session>() {
            Some(session) => session
                .get::<Principal>(session_keys::CURRENT_PRINCIPAL)
                .await
                .ok()
                .flatten(),
            None => None,
        };

        Ok(Self(principal))
    }
}

/// Helper to set the current principal in the session (login).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_principal(
    session: &Session,
    principal: &Principal,
) -> Result<(), tower_sessions::session::Error> {
    session
        .insert(session_keys::CURRENT_PRINCIPAL, principal)
        .await
}

/// Helper to clear the current principal from the session (logout).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_principal(
    session: &Session,
) -> Result<(), tower_sessions::session::Error> {
    session
        .remove::<Principal>(session_keys::CURRENT_PRINCIPAL)
        .await?;
    Ok(())
}
