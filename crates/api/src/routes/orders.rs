//! Order route handlers.
//!
//! Thin wrappers around the order service: extract the principal, parse the
//! path and body, and hand everything to the service, which owns pricing,
//! lifecycle, and authorization.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;

use clementine_core::{AccountId, OrderId, OrderStatus};

use crate::error::{AppError, Result};
use crate::middleware::OptionalAuth;
use crate::models::{CreateOrderRequest, Order};
use crate::state::AppState;

/// Query parameters for the order listing.
#[derive(Debug, Deserialize)]
pub struct ListParams {
    /// Restrict the listing to one owner (admin only for other accounts).
    pub owner: Option<AccountId>,
}

/// Request body for a status update.
///
/// The status arrives as a plain string so that values outside the
/// enumeration surface as an `invalid_status` error instead of a generic
/// deserialization failure.
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    /// The requested status.
    pub status: String,
}

fn parse_order_id(id: &str) -> Result<OrderId> {
    OrderId::parse(id).map_err(|_| AppError::NotFound(format!("order {id}")))
}

/// Create an order.
pub async fn create(
    State(state): State<AppState>,
    OptionalAuth(principal): OptionalAuth,
    Json(request): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<Order>)> {
    let order = state
        .orders()
        .create_order(principal.as_ref(), request)
        .await?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// List orders.
pub async fn index(
    State(state): State<AppState>,
    OptionalAuth(principal): OptionalAuth,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Order>>> {
    let orders = state
        .orders()
        .list_orders(principal.as_ref(), params.owner)
        .await?;
    Ok(Json(orders))
}

/// Get a single order.
pub async fn show(
    State(state): State<AppState>,
    OptionalAuth(principal): OptionalAuth,
    Path(id): Path<String>,
) -> Result<Json<Order>> {
    let id = parse_order_id(&id)?;
    let order = state.orders().get_order(principal.as_ref(), id).await?;
    Ok(Json(order))
}

/// Move an order to a new status.
pub async fn update_status(
    State(state): State<AppState>,
    OptionalAuth(principal): OptionalAuth,
    Path(id): Path<String>,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<Json<Order>> {
    let id = parse_order_id(&id)?;
    let status: OrderStatus = request
        .status
        .parse()
        .map_err(|e: String| AppError::InvalidStatus(e))?;

    let order = state
        .orders()
        .update_status(principal.as_ref(), id, status)
        .await?;
    Ok(Json(order))
}

/// Delete an order.
pub async fn destroy(
    State(state): State<AppState>,
    OptionalAuth(principal): OptionalAuth,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    let id = parse_order_id(&id)?;
    state.orders().delete_order(principal.as_ref(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}
