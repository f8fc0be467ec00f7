//! GitHub OAuth login routes.
//!
//! The OAuth mechanics (redirect, CSRF state, code exchange) live here and
//! in [`crate::github`]; account creation is the auth service's idempotent
//! login-or-register contract.

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::Redirect,
};
use serde::Deserialize;
use tower_sessions::Session;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::middleware::auth::{clear_current_principal, set_current_principal};
use crate::models::{Principal, UserAccount, session_keys};
use crate::state::AppState;

/// Query parameters GitHub sends to the OAuth callback.
#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    /// Authorization code to exchange.
    pub code: String,
    /// CSRF state token we sent on the way out.
    pub state: String,
}

/// Start a GitHub login: store a CSRF token and redirect to GitHub.
pub async fn login(State(state): State<AppState>, session: Session) -> Result<Redirect> {
    let csrf_token = Uuid::new_v4().simple().to_string();
    session
        .insert(session_keys::OAUTH_STATE, &csrf_token)
        .await?;

    Ok(Redirect::to(&state.github().authorize_url(&csrf_token)))
}

/// Handle the OAuth callback: verify state, exchange the code, log in.
pub async fn callback(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<CallbackParams>,
) -> Result<Json<UserAccount>> {
    let expected: Option<String> = session.remove(session_keys::OAUTH_STATE).await?;
    if expected.as_deref() != Some(params.state.as_str()) {
        return Err(AppError::BadRequest("invalid oauth state".to_owned()));
    }

    let token = state.github().exchange_code(&params.code).await?;
    let github_user = state.github().fetch_user(&token).await?;
    let account = state.auth().login_or_register(&github_user).await?;

    set_current_principal(&session, &account.principal()).await?;
    tracing::info!(account_id = %account.id, "login completed");

    Ok(Json(account))
}

/// Return the current principal.
pub async fn session(RequireAuth(principal): RequireAuth) -> Json<Principal> {
    Json(principal)
}

/// Log out: clear the principal from the session.
pub async fn logout(session: Session) -> Result<StatusCode> {
    clear_current_principal(&session).await?;
    Ok(StatusCode::NO_CONTENT)
}
