//! HTTP route handlers for the API.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                  - Health check
//!
//! # Auth
//! GET    /auth/github             - Redirect to GitHub OAuth
//! GET    /auth/github/callback    - Handle OAuth callback, log in
//! GET    /auth/session            - Current principal (requires auth)
//! POST   /auth/logout             - Clear the session
//!
//! # Products
//! GET    /products                - Product listing
//! GET    /products/{id}           - Product detail
//! POST   /products                - Create product (admin)
//! PATCH  /products/{id}           - Update product, incl. price (admin)
//! DELETE /products/{id}           - Delete product (admin)
//!
//! # Orders
//! POST   /orders                  - Create order (prices snapshotted)
//! GET    /orders                  - List orders (own; admin may see all)
//! GET    /orders/{id}             - Order detail (owner or admin)
//! PATCH  /orders/{id}/status      - Move order through its lifecycle
//! DELETE /orders/{id}             - Delete order (owner or admin)
//!
//! # Users
//! GET    /users/{id}              - Profile; `me` resolves to the caller
//! PATCH  /users/{id}              - Update profile (field filter by role)
//! DELETE /users/{id}              - Delete account (admin, last-admin guard)
//! ```

pub mod auth;
pub mod orders;
pub mod products;
pub mod users;

use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::state::AppState;

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/github", get(auth::login))
        .route("/github/callback", get(auth::callback))
        .route("/session", get(auth::session))
        .route("/logout", post(auth::logout))
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index).post(products::create))
        .route(
            "/{id}",
            get(products::show)
                .patch(products::update)
                .delete(products::destroy),
        )
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(orders::create).get(orders::index))
        .route("/{id}", get(orders::show).delete(orders::destroy))
        .route("/{id}/status", patch(orders::update_status))
}

/// Create the user routes router.
pub fn user_routes() -> Router<AppState> {
    Router::new().route(
        "/{id}",
        get(users::show).patch(users::update).delete(users::destroy),
    )
}

/// Create all routes for the API.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .nest("/auth", auth_routes())
        .nest("/products", product_routes())
        .nest("/orders", order_routes())
        .nest("/users", user_routes())
}
