//! Checkout handoff.
//!
//! Validates the contact form, turns the cart into a chat message and hands
//! the link back to the browser. The cart is emptied whether or not the
//! customer goes on to send the message.

use axum::{Json, extract::State};
use chrono::Utc;
use serde::Serialize;
use tracing::{error, info, instrument};
use zeltic_core::{ContactDetails, Order, OrderId};

use crate::error::Result;
use crate::services::{ClientRedirect, SessionCart};
use crate::state::AppState;

/// What the browser needs to open the chat.
#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    /// `https://wa.me/<digits>?text=<encoded message>`.
    pub url: String,
    pub message: String,
    pub total: String,
    pub order_id: OrderId,
}

/// Hand the cart off to the store's chat.
#[instrument(skip(state, cart, contact))]
pub async fn checkout(
    State(state): State<AppState>,
    mut cart: SessionCart,
    Json(contact): Json<ContactDetails>,
) -> Result<Json<CheckoutResponse>> {
    let target = state.config().checkout.target();
    let handoff = cart.hand_off(contact, &target, &ClientRedirect).await?;

    let order = Order::from_handoff(&handoff, Utc::now());
    let order_id = order.id.clone();
    let units = order.unit_count();
    if let Err(e) = state.orders().record(order).await {
        error!(error = %e, order_id = %order_id, "Failed to record order");
    } else {
        info!(order_id = %order_id, units, "Recorded order");
    }

    Ok(Json(CheckoutResponse {
        url: handoff.url,
        message: handoff.message,
        total: handoff.total.to_string(),
        order_id,
    }))
}
