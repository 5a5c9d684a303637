//! Admin API.
//!
//! Every handler takes [`RequireAdmin`](crate::middleware::RequireAdmin)
//! first, so a request without the admin capability never reaches the body
//! extractor.

pub mod inventory;
pub mod orders;
pub mod products;

use axum::{
    Router,
    routing::{get, patch, post, put},
};

use crate::state::AppState;

/// Admin routes, mounted under `/api/admin`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(products::index).post(products::create))
        .route(
            "/products/{id}",
            patch(products::update).delete(products::delete),
        )
        .route("/inventory", put(inventory::set_stock))
        .route("/inventory/batch", post(inventory::save_batch))
        .route(
            "/inventory/pending",
            get(inventory::pending)
                .put(inventory::stage_edit)
                .delete(inventory::discard_edit),
        )
        .route("/inventory/pending/save", post(inventory::save_pending))
        .route("/orders", get(orders::index))
        .route("/orders/{id}", get(orders::show))
        .route("/orders/{id}/status", patch(orders::update_status))
}
