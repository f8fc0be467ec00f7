//! User profile route handlers.
//!
//! The path segment is either the literal `me` or an explicit account ID;
//! resolution and all authorization live in the account service.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::error::Result;
use crate::middleware::OptionalAuth;
use crate::models::{ProfilePatch, UserAccount};
use crate::state::AppState;

/// Get a profile.
pub async fn show(
    State(state): State<AppState>,
    OptionalAuth(principal): OptionalAuth,
    Path(target): Path<String>,
) -> Result<Json<UserAccount>> {
    let account = state
        .accounts()
        .get_profile(principal.as_ref(), &target)
        .await?;
    Ok(Json(account))
}

/// Update a profile.
pub async fn update(
    State(state): State<AppState>,
    OptionalAuth(principal): OptionalAuth,
    Path(target): Path<String>,
    Json(patch): Json<ProfilePatch>,
) -> Result<Json<UserAccount>> {
    let account = state
        .accounts()
        .update_profile(principal.as_ref(), &target, patch)
        .await?;
    Ok(Json(account))
}

/// Delete an account.
pub async fn destroy(
    State(state): State<AppState>,
    OptionalAuth(principal): OptionalAuth,
    Path(target): Path<String>,
) -> Result<StatusCode> {
    state
        .accounts()
        .delete_account(principal.as_ref(), &target)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
