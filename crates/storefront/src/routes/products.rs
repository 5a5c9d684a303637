//! Catalog route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use zeltic_core::{
    CatalogFilter, CatalogProduct, ProductId, SizeAvailability, SizeLabel, StockBound, StockError,
    catalog::distinct_tags,
};

use crate::db::ProductRepository;
use crate::error::{AppError, Result};
use crate::state::AppState;

/// A page of the catalog plus the tags available for filtering it.
#[derive(Debug, Serialize)]
pub struct ProductListing {
    pub products: Vec<CatalogProduct>,
    /// Tags present in the selected category, ignoring the tag filter.
    pub tags: Vec<String>,
}

/// Product with its size picker entries.
#[derive(Debug, Serialize)]
pub struct ProductDetail {
    #[serde(flatten)]
    pub product: CatalogProduct,
    pub sizes: Vec<SizeAvailability>,
}

/// Query for the quantity stepper.
#[derive(Debug, Deserialize)]
pub struct StockQuery {
    pub size: Option<String>,
    pub quantity: Option<u32>,
}

/// Stepper state for one size.
#[derive(Debug, Serialize)]
pub struct StockView {
    pub size: SizeLabel,
    pub bound: StockBound,
    /// Units in the slot when it was read.
    pub stock: u32,
    pub min: u32,
    pub max: u32,
    /// Requested quantity pulled into range.
    pub quantity: u32,
    pub can_increment: bool,
    pub can_decrement: bool,
    pub can_add_to_cart: bool,
}

pub(crate) async fn find_product(state: &AppState, id: ProductId) -> Result<CatalogProduct> {
    ProductRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))
}

/// List products, newest first.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(filter): Query<CatalogFilter>,
) -> Result<Json<ProductListing>> {
    let in_category = CatalogFilter {
        category: filter.category.clone(),
        tag: None,
    };
    let products = ProductRepository::new(state.pool())
        .list(&in_category)
        .await?;

    let tags = distinct_tags(&products);
    let products = filter.apply(&products).into_iter().cloned().collect();

    Ok(Json(ProductListing { products, tags }))
}

/// Product detail.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<ProductDetail>> {
    let product = find_product(&state, id).await?;
    let sizes = product.sizes();
    Ok(Json(ProductDetail { product, sizes }))
}

/// Resolve the quantity range for a size.
#[instrument(skip(state))]
pub async fn stock(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
    Query(query): Query<StockQuery>,
) -> Result<Json<StockView>> {
    let size = query
        .size
        .as_deref()
        .and_then(|s| SizeLabel::parse(s).ok())
        .ok_or(StockError::NoSizeSelected)?;
    let product = find_product(&state, id).await?;

    let bound = product.stock_bound(&size);
    let stock = product.stock_for(&size);
    Ok(Json(stock_view(bound, stock, size, query.quantity)))
}

fn stock_view(bound: StockBound, stock: u32, size: SizeLabel, requested: Option<u32>) -> StockView {
    let range = bound.range();
    let quantity = bound.clamp(requested.unwrap_or(*range.start()));
    StockView {
        size,
        bound,
        stock,
        min: *range.start(),
        max: *range.end(),
        quantity,
        can_increment: bound.increment(quantity).is_some(),
        can_decrement: bound.decrement(quantity).is_some(),
        can_add_to_cart: bound.is_selectable(quantity),
    }
}
