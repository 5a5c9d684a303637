//! Cart route handlers.
//!
//! The cart lives in the session under the `zeltic-cart` key. Adding
//! re-reads the product's inventory so the stock bound is current at that
//! moment; later stock changes do not touch lines already in the cart.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use zeltic_core::{Cart, CartLine, ProductId, SizeLabel};

use super::products::find_product;
use crate::error::{Result, add_breadcrumb};
use crate::services::SessionCart;
use crate::state::AppState;

/// Cart contents and totals.
#[derive(Debug, Serialize)]
pub struct CartView {
    pub items: Vec<CartLine>,
    /// Two-decimal total, e.g. `"150.00"`.
    pub total: String,
    pub total_items: u32,
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            items: cart.items().to_vec(),
            total: cart.total(),
            total_items: cart.total_items(),
        }
    }
}

/// Badge count.
#[derive(Debug, Serialize)]
pub struct CartCount {
    pub count: u32,
}

/// Add-to-cart request. `size` is optional so a missing pick is reported as
/// "select a size" rather than a malformed body.
#[derive(Debug, Deserialize)]
pub struct AddToCart {
    pub product_id: ProductId,
    pub size: Option<String>,
    pub quantity: Option<u32>,
}

/// Set-quantity request. Zero or below removes the line.
#[derive(Debug, Deserialize)]
pub struct UpdateCart {
    pub product_id: ProductId,
    pub size: SizeLabel,
    pub quantity: i64,
}

/// Identifies one cart line.
#[derive(Debug, Deserialize)]
pub struct LineRef {
    pub product_id: ProductId,
    pub size: SizeLabel,
}

/// Show the cart.
#[instrument(skip(cart))]
pub async fn show(cart: SessionCart) -> Json<CartView> {
    Json(CartView::from(cart.cart()))
}

/// Add a product/size to the cart after checking its stock bound.
#[instrument(skip(state, cart))]
pub async fn add(
    State(state): State<AppState>,
    mut cart: SessionCart,
    Json(request): Json<AddToCart>,
) -> Result<Json<CartView>> {
    let product = find_product(&state, request.product_id).await?;
    let line = product.select(request.size.as_deref(), request.quantity.unwrap_or(1))?;

    add_breadcrumb(
        "cart",
        "Added to cart",
        Some(&[
            ("product_id", &line.product_id.to_string()),
            ("size", line.size.as_str()),
        ]),
    );
    cart.add_item(line).await;

    Ok(Json(CartView::from(cart.cart())))
}

/// Set a line's quantity.
#[instrument(skip(cart))]
pub async fn update(mut cart: SessionCart, Json(request): Json<UpdateCart>) -> Json<CartView> {
    if request.quantity <= 0 {
        cart.remove_item(request.product_id, &request.size).await;
    } else {
        let quantity = u32::try_from(request.quantity).unwrap_or(u32::MAX);
        cart.update_quantity(request.product_id, &request.size, quantity)
            .await;
    }
    Json(CartView::from(cart.cart()))
}

/// Remove a line.
#[instrument(skip(cart))]
pub async fn remove(mut cart: SessionCart, Json(line): Json<LineRef>) -> Json<CartView> {
    cart.remove_item(line.product_id, &line.size).await;
    Json(CartView::from(cart.cart()))
}

/// Empty the cart.
#[instrument(skip(cart))]
pub async fn clear(mut cart: SessionCart) -> Json<CartView> {
    cart.clear().await;
    Json(CartView::from(cart.cart()))
}

/// Total number of units, for the header badge.
#[instrument(skip(cart))]
pub async fn count(cart: SessionCart) -> Json<CartCount> {
    Json(CartCount {
        count: cart.cart().total_items(),
    })
}
