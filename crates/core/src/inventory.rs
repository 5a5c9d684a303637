//! Admin stock edits.
//!
//! Writes are last-write-wins: an edit replaces whatever count the slot holds,
//! with no version check against what the admin originally saw.

use serde::{Deserialize, Serialize};

use crate::catalog::InventorySlot;
use crate::types::{ProductId, SizeLabel};

/// Largest stock count the `inventory.stock` column can hold.
pub const MAX_STOCK: u32 = i32::MAX.unsigned_abs();

/// Clamp a raw admin-entered count into `0..=MAX_STOCK`.
#[must_use]
pub fn clamp_stock(raw: i64) -> u32 {
    u32::try_from(raw.clamp(0, i64::from(MAX_STOCK))).unwrap_or(0)
}

/// One staged write to an inventory slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockEdit {
    pub product_id: ProductId,
    pub size: SizeLabel,
    pub stock: u32,
}

impl StockEdit {
    /// Build an edit, clamping negative input to zero.
    #[must_use]
    pub fn new(product_id: ProductId, size: SizeLabel, raw_stock: i64) -> Self {
        Self {
            product_id,
            size,
            stock: clamp_stock(raw_stock),
        }
    }

    /// Staging key, `<product id>-<size>`.
    #[must_use]
    pub fn key(&self) -> String {
        format!("{}-{}", self.product_id, self.size)
    }

    fn same_slot(&self, other: &Self) -> bool {
        self.product_id == other.product_id && self.size == other.size
    }
}

/// Edits staged in the stock editor but not yet saved.
///
/// At most one edit per `(product, size)`; staging the same slot again
/// replaces the earlier value and keeps its position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PendingStockEdits {
    edits: Vec<StockEdit>,
}

impl PendingStockEdits {
    #[must_use]
    pub const fn new() -> Self {
        Self { edits: Vec::new() }
    }

    pub fn stage(&mut self, edit: StockEdit) {
        match self.edits.iter_mut().find(|e| e.same_slot(&edit)) {
            Some(existing) => existing.stock = edit.stock,
            None => self.edits.push(edit),
        }
    }

    /// Drop the staged edit for a slot, if any.
    pub fn discard(&mut self, product_id: ProductId, size: &SizeLabel) {
        self.edits
            .retain(|e| !(e.product_id == product_id && e.size == *size));
    }

    #[must_use]
    pub fn get(&self, product_id: ProductId, size: &SizeLabel) -> Option<u32> {
        self.edits
            .iter()
            .find(|e| e.product_id == product_id && e.size == *size)
            .map(|e| e.stock)
    }

    pub fn iter(&self) -> impl Iterator<Item = &StockEdit> {
        self.edits.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.edits.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    /// Products touched by a staged edit, in staging order.
    #[must_use]
    pub fn product_ids(&self) -> Vec<ProductId> {
        let mut ids: Vec<ProductId> = Vec::new();
        for edit in &self.edits {
            if !ids.contains(&edit.product_id) {
                ids.push(edit.product_id);
            }
        }
        ids
    }

    /// Overlay the staged values on `stored` slots: what the editor shows
    /// before saving.
    #[must_use]
    pub fn preview(&self, mut stored: Vec<InventorySlot>) -> Vec<InventorySlot> {
        for edit in &self.edits {
            upsert_slot(&mut stored, edit);
        }
        stored
    }
}

impl FromIterator<StockEdit> for PendingStockEdits {
    fn from_iter<T: IntoIterator<Item = StockEdit>>(iter: T) -> Self {
        let mut pending = Self::new();
        for edit in iter {
            pending.stage(edit);
        }
        pending
    }
}

impl IntoIterator for PendingStockEdits {
    type Item = StockEdit;
    type IntoIter = std::vec::IntoIter<StockEdit>;

    fn into_iter(self) -> Self::IntoIter {
        self.edits.into_iter()
    }
}

/// Apply an edit to an in-memory slot list, inserting the slot if missing.
pub fn upsert_slot(slots: &mut Vec<InventorySlot>, edit: &StockEdit) {
    match slots
        .iter_mut()
        .find(|s| s.product_id == edit.product_id && s.size == edit.size)
    {
        Some(slot) => slot.stock = edit.stock,
        None => slots.push(InventorySlot {
            product_id: edit.product_id,
            size: edit.size.clone(),
            stock: edit.stock,
        }),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn size(s: &str) -> SizeLabel {
        SizeLabel::parse(s).unwrap()
    }

    #[test]
    fn negative_stock_clamps_to_zero() {
        assert_eq!(StockEdit::new(ProductId::new(1), size("32"), -4).stock, 0);
        assert_eq!(clamp_stock(i64::MAX), MAX_STOCK);
        assert_eq!(clamp_stock(12), 12);
    }

    #[test]
    fn restaging_replaces_in_place() {
        let mut pending = PendingStockEdits::new();
        pending.stage(StockEdit::new(ProductId::new(1), size("30"), 5));
        pending.stage(StockEdit::new(ProductId::new(1), size("32"), 2));
        pending.stage(StockEdit::new(ProductId::new(1), size("30"), 9));

        let keys: Vec<_> = pending.iter().map(StockEdit::key).collect();
        assert_eq!(keys, ["1-30", "1-32"]);
        assert_eq!(pending.get(ProductId::new(1), &size("30")), Some(9));
    }

    #[test]
    fn discard_drops_only_that_slot() {
        let mut pending: PendingStockEdits = [
            StockEdit::new(ProductId::new(1), size("30"), 5),
            StockEdit::new(ProductId::new(2), size("30"), 1),
        ]
        .into_iter()
        .collect();
        pending.discard(ProductId::new(1), &size("30"));
        assert_eq!(pending.len(), 1);
        assert_eq!(pending.get(ProductId::new(2), &size("30")), Some(1));
    }

    #[test]
    fn preview_prefers_staged_values() {
        let stored = vec![
            InventorySlot {
                product_id: ProductId::new(1),
                size: size("30"),
                stock: 5,
            },
            InventorySlot {
                product_id: ProductId::new(1),
                size: size("32"),
                stock: 2,
            },
        ];
        let pending: PendingStockEdits = [
            StockEdit::new(ProductId::new(1), size("32"), 8),
            StockEdit::new(ProductId::new(1), size("34"), 1),
        ]
        .into_iter()
        .collect();

        let shown: Vec<(String, u32)> = pending
            .preview(stored)
            .into_iter()
            .map(|s| (s.size.to_string(), s.stock))
            .collect();
        assert_eq!(
            shown,
            [("30".to_owned(), 5), ("32".to_owned(), 8), ("34".to_owned(), 1)]
        );
        assert_eq!(pending.product_ids(), [ProductId::new(1)]);
    }

    #[test]
    fn upsert_inserts_then_overwrites() {
        let mut slots = Vec::new();
        upsert_slot(&mut slots, &StockEdit::new(ProductId::new(3), size("M"), 4));
        upsert_slot(&mut slots, &StockEdit::new(ProductId::new(3), size("M"), 0));
        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].stock, 0);
    }
}
