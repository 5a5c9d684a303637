//! Admin product management.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use tracing::{info, instrument};
use zeltic_core::{CatalogFilter, CatalogProduct, ProductId, catalog::search};

use crate::db::{NewProduct, ProductRepository, ProductUpdate};
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::state::AppState;

/// Admin search query.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    /// Name (case-insensitive) or id fragment.
    pub q: Option<String>,
}

/// Whole catalog, narrowed by `q`.
#[instrument(skip(state, _admin))]
pub async fn index(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<CatalogProduct>>> {
    let products = ProductRepository::new(state.pool())
        .list(&CatalogFilter::default())
        .await?;
    let term = query.q.as_deref().unwrap_or_default();
    Ok(Json(search(&products, term).into_iter().cloned().collect()))
}

/// Create a product with optional initial stock.
#[instrument(skip(state, admin, new), fields(name = %new.name))]
pub async fn create(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(new): Json<NewProduct>,
) -> Result<(StatusCode, Json<CatalogProduct>)> {
    if new.name.trim().is_empty() {
        return Err(AppError::BadRequest("name is required".to_owned()));
    }
    let product = ProductRepository::new(state.pool()).create(&new).await?;
    info!(product_id = %product.id(), admin_id = %admin.id, "Product created");
    Ok((StatusCode::CREATED, Json(product)))
}

/// Update product fields; absent fields are kept.
#[instrument(skip(state, admin, update))]
pub async fn update(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
    Json(update): Json<ProductUpdate>,
) -> Result<Json<CatalogProduct>> {
    if update.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
        return Err(AppError::BadRequest("name cannot be blank".to_owned()));
    }
    let product = ProductRepository::new(state.pool())
        .update(id, &update)
        .await?;
    info!(product_id = %id, admin_id = %admin.id, "Product updated");
    Ok(Json(product))
}

/// Delete a product and its inventory.
#[instrument(skip(state, admin))]
pub async fn delete(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<StatusCode> {
    ProductRepository::new(state.pool()).delete(id).await?;
    info!(product_id = %id, admin_id = %admin.id, "Product deleted");
    Ok(StatusCode::NO_CONTENT)
}
