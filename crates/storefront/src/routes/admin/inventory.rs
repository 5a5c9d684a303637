//! Admin stock editing.
//!
//! Counts can be written straight away, sent as one batch, or staged in the
//! admin's session and saved together. Staged edits survive page reloads and
//! are dropped on logout.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::{info, instrument};
use zeltic_core::{InventorySlot, PendingStockEdits, ProductId, SizeLabel, StockEdit};

use crate::db::InventoryRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::models::session_keys;
use crate::services::{BatchReport, InventoryEditor};
use crate::state::AppState;

/// One stock count as typed by the admin. Negative values save as zero.
#[derive(Debug, Deserialize)]
pub struct StockInput {
    pub product_id: ProductId,
    pub size: SizeLabel,
    pub stock: i64,
}

impl From<StockInput> for StockEdit {
    fn from(input: StockInput) -> Self {
        Self::new(input.product_id, input.size, input.stock)
    }
}

/// Staged edits. A later edit of the same slot replaces an earlier one.
#[derive(Debug, Deserialize)]
pub struct BatchRequest {
    pub edits: Vec<StockInput>,
}

/// A slot whose staged edit should be dropped.
#[derive(Debug, Deserialize)]
pub struct SlotRef {
    pub product_id: ProductId,
    pub size: SizeLabel,
}

/// Staged edits plus the affected slots as they will read after saving.
#[derive(Debug, Serialize)]
pub struct PendingView {
    pub edits: PendingStockEdits,
    pub preview: Vec<InventorySlot>,
}

/// Set one slot immediately.
#[instrument(skip(state, admin))]
pub async fn set_stock(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<StockInput>,
) -> Result<Json<InventorySlot>> {
    let slot = InventoryEditor::new(state.pool())
        .set_stock(input.product_id, input.size, input.stock)
        .await?;
    info!(
        product_id = %slot.product_id,
        size = %slot.size,
        stock = slot.stock,
        admin_id = %admin.id,
        "Stock set"
    );
    Ok(Json(slot))
}

/// Save a batch of staged edits in order.
#[instrument(skip(state, admin, request), fields(edits = request.edits.len()))]
pub async fn save_batch(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(request): Json<BatchRequest>,
) -> Result<Json<BatchReport>> {
    let pending = stage(request.edits);
    if pending.is_empty() {
        return Err(AppError::BadRequest("no stock edits to save".to_owned()));
    }

    let report = InventoryEditor::new(state.pool())
        .apply_batch(pending)
        .await?;
    info!(applied = report.applied, admin_id = %admin.id, "Stock batch applied");
    Ok(Json(report))
}

fn stage(inputs: Vec<StockInput>) -> PendingStockEdits {
    inputs.into_iter().map(StockEdit::from).collect()
}

async fn load_pending(session: &Session) -> Result<PendingStockEdits> {
    Ok(session
        .get::<PendingStockEdits>(session_keys::PENDING_STOCK)
        .await?
        .unwrap_or_default())
}

async fn pending_view(state: &AppState, edits: PendingStockEdits) -> Result<PendingView> {
    let ids: Vec<i32> = edits.product_ids().iter().map(ProductId::as_i32).collect();
    let stored = InventoryRepository::new(state.pool()).slots_for(&ids).await?;
    let preview = edits.preview(stored);
    Ok(PendingView { edits, preview })
}

/// Edits staged in this session.
#[instrument(skip(state, _admin, session))]
pub async fn pending(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<PendingView>> {
    let edits = load_pending(&session).await?;
    Ok(Json(pending_view(&state, edits).await?))
}

/// Stage one edit. Staging the same slot again replaces the earlier value.
#[instrument(skip(state, _admin, session))]
pub async fn stage_edit(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    session: Session,
    Json(input): Json<StockInput>,
) -> Result<Json<PendingView>> {
    let mut edits = load_pending(&session).await?;
    edits.stage(input.into());
    session.insert(session_keys::PENDING_STOCK, &edits).await?;
    Ok(Json(pending_view(&state, edits).await?))
}

/// Drop the staged edit of one slot.
#[instrument(skip(state, _admin, session))]
pub async fn discard_edit(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    session: Session,
    Json(slot): Json<SlotRef>,
) -> Result<Json<PendingView>> {
    let mut edits = load_pending(&session).await?;
    edits.discard(slot.product_id, &slot.size);
    session.insert(session_keys::PENDING_STOCK, &edits).await?;
    Ok(Json(pending_view(&state, edits).await?))
}

/// Save every staged edit. On a partial failure the staged edits are kept,
/// so saving again rewrites the ones that went through with the same values.
#[instrument(skip(state, admin, session))]
pub async fn save_pending(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<BatchReport>> {
    let edits = load_pending(&session).await?;
    if edits.is_empty() {
        return Err(AppError::BadRequest("no stock edits to save".to_owned()));
    }

    let report = InventoryEditor::new(state.pool()).apply_batch(edits).await?;
    session
        .remove::<PendingStockEdits>(session_keys::PENDING_STOCK)
        .await?;
    info!(applied = report.applied, admin_id = %admin.id, "Staged stock edits saved");
    Ok(Json(report))
}
