//! Admin order list.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use tracing::{info, instrument};
use zeltic_core::{Order, OrderId, OrderStatus};

use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::state::AppState;

/// Status change request.
#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: OrderStatus,
}

/// All orders, newest first.
#[instrument(skip(state, _admin))]
pub async fn index(_admin: RequireAdmin, State(state): State<AppState>) -> Result<Json<Vec<Order>>> {
    Ok(Json(state.orders().list().await?))
}

/// One order.
#[instrument(skip(state, _admin))]
pub async fn show(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
) -> Result<Json<Order>> {
    state
        .orders()
        .get(&id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("order {id}")))
}

/// Move an order to any status.
#[instrument(skip(state, admin))]
pub async fn update_status(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
    Json(update): Json<StatusUpdate>,
) -> Result<Json<Order>> {
    let order = state.orders().update_status(&id, update.status).await?;
    info!(order_id = %id, status = %update.status, admin_id = %admin.id, "Order status changed");
    Ok(Json(order))
}
