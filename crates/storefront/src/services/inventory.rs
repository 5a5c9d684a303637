//! Admin inventory editor.
//!
//! A batch save writes its edits one at a time, in staging order, without a
//! spanning transaction. The first failed write stops the batch; earlier
//! writes stay applied.

use serde::Serialize;
use sqlx::PgPool;
use thiserror::Error;
use tracing::{info, instrument, warn};
use zeltic_core::{InventorySlot, PendingStockEdits, ProductId, SizeLabel, StockEdit};

use crate::db::{InventoryRepository, RepositoryError};

/// A batch save that stopped part way.
#[derive(Debug, Error)]
#[error("saved {applied} of {total} stock edits; {failed} failed: {source}")]
pub struct InventoryError {
    /// Writes that went through before the failure.
    pub applied: usize,
    /// Edits in the batch.
    pub total: usize,
    /// Staging key of the edit that failed.
    pub failed: String,
    #[source]
    pub source: RepositoryError,
}

/// Outcome of a fully applied batch.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub applied: usize,
    pub slots: Vec<InventorySlot>,
}

/// Writes stock counts.
pub struct InventoryEditor<'a> {
    slots: InventoryRepository<'a>,
}

impl<'a> InventoryEditor<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            slots: InventoryRepository::new(pool),
        }
    }

    /// Set one slot, clamping negative input to zero.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` for an unknown product.
    pub async fn set_stock(
        &self,
        product_id: ProductId,
        size: SizeLabel,
        raw_stock: i64,
    ) -> Result<InventorySlot, RepositoryError> {
        self.slots
            .upsert(&StockEdit::new(product_id, size, raw_stock))
            .await
    }

    /// Apply staged edits in order.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryError`] with the number of writes already applied
    /// when one fails. Those writes are not rolled back.
    #[instrument(skip(self, edits), fields(total = edits.len()))]
    pub async fn apply_batch(&self, edits: PendingStockEdits) -> Result<BatchReport, InventoryError> {
        let total = edits.len();
        let mut slots = Vec::with_capacity(total);

        for edit in edits {
            match self.slots.upsert(&edit).await {
                Ok(slot) => slots.push(slot),
                Err(source) => {
                    warn!(applied = slots.len(), total, failed = %edit.key(), "Stock batch stopped");
                    return Err(InventoryError {
                        applied: slots.len(),
                        total,
                        failed: edit.key(),
                        source,
                    });
                }
            }
        }

        info!(applied = slots.len(), "Stock batch saved");
        Ok(BatchReport {
            applied: slots.len(),
            slots,
        })
    }
}
