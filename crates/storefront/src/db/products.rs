//! Product repository.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::{FromRow, PgPool};
use tracing::instrument;
use zeltic_core::{CatalogFilter, CatalogProduct, InventorySlot, Price, Product, ProductId};

use super::RepositoryError;
use super::inventory::{self, InventoryRow};

const PRODUCT_COLUMNS: &str =
    "id, name, description, price, images, category, tag, created_at, updated_at";

#[derive(Debug, FromRow)]
struct ProductRow {
    id: i32,
    name: String,
    description: Option<String>,
    price: Decimal,
    images: Vec<String>,
    category: Option<String>,
    tag: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ProductRow> for Product {
    type Error = RepositoryError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        let price = Price::new(row.price).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid price for product {}: {e}", row.id))
        })?;
        Ok(Self {
            id: ProductId::new(row.id),
            name: row.name,
            description: row.description,
            price,
            images: row.images,
            category: row.category,
            tag: row.tag,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// A new product with optional initial stock.
#[derive(Debug, Clone, Deserialize)]
pub struct NewProduct {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: Price,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub tag: Option<String>,
    /// Initial slots as `(size, stock)`; negative stock is clamped to zero.
    #[serde(default)]
    pub inventory: Vec<NewSlot>,
}

/// Initial stock for one size.
#[derive(Debug, Clone, Deserialize)]
pub struct NewSlot {
    pub size: zeltic_core::SizeLabel,
    pub stock: i64,
}

/// Partial product update; absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Price>,
    pub images: Option<Vec<String>>,
    pub category: Option<String>,
    pub tag: Option<String>,
}

/// Repository for catalog reads and admin product writes.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List products with their inventory, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    #[instrument(skip(self))]
    pub async fn list(&self, filter: &CatalogFilter) -> Result<Vec<CatalogProduct>, RepositoryError> {
        let rows: Vec<ProductRow> = sqlx::query_as(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE ($1::text IS NULL OR category = $1) \
               AND ($2::text IS NULL OR tag = $2) \
             ORDER BY created_at DESC, id DESC"
        ))
        .bind(filter.category())
        .bind(filter.tag())
        .fetch_all(self.pool)
        .await?;

        self.attach_inventory(rows).await
    }

    /// Get one product with its inventory.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn get(&self, id: ProductId) -> Result<Option<CatalogProduct>, RepositoryError> {
        let row: Option<ProductRow> =
            sqlx::query_as(&format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"))
                .bind(id.as_i32())
                .fetch_optional(self.pool)
                .await?;

        match row {
            Some(row) => Ok(self.attach_inventory(vec![row]).await?.into_iter().next()),
            None => Ok(None),
        }
    }

    /// Create a product and its initial slots in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if two initial slots share a size.
    #[instrument(skip(self, new), fields(name = %new.name))]
    pub async fn create(&self, new: &NewProduct) -> Result<CatalogProduct, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let row: ProductRow = sqlx::query_as(&format!(
            "INSERT INTO products (name, description, price, images, category, tag) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(new.name.trim())
        .bind(new.description.as_deref())
        .bind(new.price.amount())
        .bind(&new.images)
        .bind(new.category.as_deref())
        .bind(new.tag.as_deref())
        .fetch_one(&mut *tx)
        .await?;

        let mut slots = Vec::with_capacity(new.inventory.len());
        for slot in &new.inventory {
            let stock = zeltic_core::clamp_stock(slot.stock);
            let inserted: InventoryRow = sqlx::query_as(
                "INSERT INTO inventory (product_id, size, stock) VALUES ($1, $2, $3) \
                 RETURNING product_id, size, stock",
            )
            .bind(row.id)
            .bind(slot.size.as_str())
            .bind(inventory::stock_to_db(stock))
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| RepositoryError::from_write(e, "duplicate size"))?;
            slots.push(InventorySlot::try_from(inserted)?);
        }

        tx.commit().await?;

        Ok(CatalogProduct {
            product: Product::try_from(row)?,
            inventory: slots,
        })
    }

    /// Apply a partial update.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product does not exist.
    #[instrument(skip(self, update), fields(product_id = %id))]
    pub async fn update(
        &self,
        id: ProductId,
        update: &ProductUpdate,
    ) -> Result<CatalogProduct, RepositoryError> {
        let row: Option<ProductRow> = sqlx::query_as(&format!(
            "UPDATE products SET \
                name = COALESCE($2, name), \
                description = COALESCE($3, description), \
                price = COALESCE($4, price), \
                images = COALESCE($5, images), \
                category = COALESCE($6, category), \
                tag = COALESCE($7, tag), \
                updated_at = now() \
             WHERE id = $1 \
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(id.as_i32())
        .bind(update.name.as_deref().map(str::trim))
        .bind(update.description.as_deref())
        .bind(update.price.map(|p| p.amount()))
        .bind(update.images.as_deref())
        .bind(update.category.as_deref())
        .bind(update.tag.as_deref())
        .fetch_optional(self.pool)
        .await?;

        let row = row.ok_or(RepositoryError::NotFound)?;
        self.attach_inventory(vec![row])
            .await?
            .into_iter()
            .next()
            .ok_or(RepositoryError::NotFound)
    }

    /// Delete a product; its slots go with it.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product does not exist.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn delete(&self, id: ProductId) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM inventory WHERE product_id = $1")
            .bind(id.as_i32())
            .execute(&mut *tx)
            .await?;
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id.as_i32())
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        tx.commit().await?;
        Ok(())
    }

    async fn attach_inventory(
        &self,
        rows: Vec<ProductRow>,
    ) -> Result<Vec<CatalogProduct>, RepositoryError> {
        let ids: Vec<i32> = rows.iter().map(|r| r.id).collect();
        let mut by_product: HashMap<ProductId, Vec<InventorySlot>> = HashMap::new();
        for slot in super::InventoryRepository::new(self.pool).slots_for(&ids).await? {
            by_product.entry(slot.product_id).or_default().push(slot);
        }

        rows.into_iter()
            .map(|row| {
                let product = Product::try_from(row)?;
                let inventory = by_product.remove(&product.id).unwrap_or_default();
                Ok(CatalogProduct { product, inventory })
            })
            .collect()
    }
}
