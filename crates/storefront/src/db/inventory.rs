//! Inventory slot repository.
//!
//! Stock writes are plain upserts. There is no version column, so two admins
//! saving the same slot race and the last write wins.

use sqlx::{FromRow, PgPool};
use tracing::instrument;
use zeltic_core::{InventorySlot, ProductId, SizeLabel, StockEdit};

use super::RepositoryError;

#[derive(Debug, FromRow)]
pub(super) struct InventoryRow {
    product_id: i32,
    size: String,
    stock: i32,
}

impl TryFrom<InventoryRow> for InventorySlot {
    type Error = RepositoryError;

    fn try_from(row: InventoryRow) -> Result<Self, Self::Error> {
        let size = SizeLabel::parse(&row.size).map_err(|_| {
            RepositoryError::DataCorruption(format!(
                "empty size label for product {}",
                row.product_id
            ))
        })?;
        Ok(Self {
            product_id: ProductId::new(row.product_id),
            size,
            stock: row.stock.max(0).unsigned_abs(),
        })
    }
}

const SLOTS_FOR_SQL: &str = "SELECT product_id, size, stock FROM inventory \
     WHERE product_id = ANY($1) ORDER BY product_id, size";

/// Domain stock is already clamped to `i32::MAX`.
pub(super) fn stock_to_db(stock: u32) -> i32 {
    i32::try_from(stock).unwrap_or(i32::MAX)
}

/// Repository for inventory slots.
pub struct InventoryRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> InventoryRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All slots of the given products.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn slots_for(&self, product_ids: &[i32]) -> Result<Vec<InventorySlot>, RepositoryError> {
        if product_ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows: Vec<InventoryRow> = sqlx::query_as(SLOTS_FOR_SQL)
        .bind(product_ids)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(InventorySlot::try_from).collect()
    }

    /// Write one slot, inserting it if the product has no such size yet.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product does not exist.
    #[instrument(skip(self), fields(product_id = %edit.product_id, size = %edit.size, stock = edit.stock))]
    pub async fn upsert(&self, edit: &StockEdit) -> Result<InventorySlot, RepositoryError> {
        let row: InventoryRow = sqlx::query_as(
            "INSERT INTO inventory (product_id, size, stock) VALUES ($1, $2, $3) \
             ON CONFLICT (product_id, size) DO UPDATE SET stock = EXCLUDED.stock \
             RETURNING product_id, size, stock",
        )
        .bind(edit.product_id.as_i32())
        .bind(edit.size.as_str())
        .bind(stock_to_db(edit.stock))
        .fetch_one(self.pool)
        .await
        .map_err(|e| RepositoryError::from_write(e, "inventory slot"))?;

        InventorySlot::try_from(row)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn negative_db_stock_reads_as_zero() {
        let slot = InventorySlot::try_from(InventoryRow {
            product_id: 1,
            size: "32".to_owned(),
            stock: -3,
        });
        assert!(matches!(slot, Ok(InventorySlot { stock: 0, .. })));
    }

    #[test]
    fn blank_size_is_corruption() {
        let slot = InventorySlot::try_from(InventoryRow {
            product_id: 1,
            size: "  ".to_owned(),
            stock: 3,
        });
        assert!(matches!(slot, Err(RepositoryError::DataCorruption(_))));
    }

    /// Column names declared by the inventory migration.
    fn migrated_columns() -> Vec<&'static str> {
        include_str!("../../migrations/20260301000002_create_inventory.sql")
            .lines()
            .map(str::trim)
            .filter_map(|line| line.split_whitespace().next())
            .filter(|word| word.chars().all(|c| c.is_ascii_lowercase() || c == '_'))
            .collect()
    }

    #[test]
    fn slot_query_uses_only_migrated_columns() {
        let columns = migrated_columns();
        let (select, rest) = SLOTS_FOR_SQL
            .trim_start_matches("SELECT ")
            .split_once(" FROM ")
            .unwrap();
        let (_, order_by) = rest.split_once("ORDER BY ").unwrap();

        for column in select.split(',').chain(order_by.split(',')).map(str::trim) {
            assert!(columns.contains(&column), "inventory has no column {column}");
        }
    }

    #[test]
    fn stock_fits_column() {
        assert_eq!(stock_to_db(5), 5);
        assert_eq!(stock_to_db(u32::MAX), i32::MAX);
    }
}
