//! Catalog product route handlers.
//!
//! Reads are public; mutations (including price changes) are
//! administrator-only. Price changes never affect existing orders - their
//! line items carry the snapshot taken at creation time.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use clementine_core::ProductId;

use crate::error::{AppError, Result};
use crate::middleware::OptionalAuth;
use crate::models::{NewProduct, Product, ProductPatch};
use crate::policy;
use crate::state::AppState;

fn parse_product_id(id: &str) -> Result<ProductId> {
    ProductId::parse(id).map_err(|_| AppError::NotFound(format!("product {id}")))
}

/// List all products.
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<Product>>> {
    Ok(Json(state.catalog().list().await?))
}

/// Get a single product.
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Product>> {
    let id = parse_product_id(&id)?;
    let product = state
        .catalog()
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;
    Ok(Json(product))
}

/// Create a product.
pub async fn create(
    State(state): State<AppState>,
    OptionalAuth(principal): OptionalAuth,
    Json(new): Json<NewProduct>,
) -> Result<(StatusCode, Json<Product>)> {
    policy::require_admin(principal.as_ref())?;

    let product = Product::new(new);
    state.catalog().insert(product.clone()).await?;
    tracing::info!(product_id = %product.id, "product created");

    Ok((StatusCode::CREATED, Json(product)))
}

/// Update a product.
pub async fn update(
    State(state): State<AppState>,
    OptionalAuth(principal): OptionalAuth,
    Path(id): Path<String>,
    Json(patch): Json<ProductPatch>,
) -> Result<Json<Product>> {
    policy::require_admin(principal.as_ref())?;

    let id = parse_product_id(&id)?;
    let mut product = state
        .catalog()
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;

    product.apply(patch);
    state.catalog().update(product.clone()).await?;
    tracing::info!(product_id = %product.id, "product updated");

    Ok(Json(product))
}

/// Delete a product.
pub async fn destroy(
    State(state): State<AppState>,
    OptionalAuth(principal): OptionalAuth,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    policy::require_admin(principal.as_ref())?;

    let id = parse_product_id(&id)?;
    if !state.catalog().delete(id).await? {
        return Err(AppError::NotFound(format!("product {id}")));
    }
    tracing::info!(product_id = %id, "product deleted");

    Ok(StatusCode::NO_CONTENT)
}
