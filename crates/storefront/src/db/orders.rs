//! Order repository for the `remote` order backend.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};
use tracing::instrument;
use zeltic_core::{CartLine, ContactDetails, Order, OrderId, OrderStatus, Price, ProductId, SizeLabel};

use super::RepositoryError;

const ORDER_COLUMNS: &str = "id, customer_name, customer_last_name, phone, address, \
                             postal_code, notes, total, status, created_at";

#[derive(Debug, FromRow)]
struct OrderRow {
    id: String,
    customer_name: String,
    customer_last_name: String,
    phone: String,
    address: String,
    postal_code: String,
    notes: Option<String>,
    total: Decimal,
    status: String,
    created_at: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
struct OrderItemRow {
    order_id: String,
    product_id: i32,
    name: String,
    size: String,
    quantity: i32,
    price: Decimal,
    image: Option<String>,
}

fn corrupt(order_id: &str, what: impl std::fmt::Display) -> RepositoryError {
    RepositoryError::DataCorruption(format!("order {order_id}: {what}"))
}

impl TryFrom<OrderItemRow> for CartLine {
    type Error = RepositoryError;

    fn try_from(row: OrderItemRow) -> Result<Self, Self::Error> {
        Ok(Self {
            product_id: ProductId::new(row.product_id),
            price: Price::new(row.price).map_err(|e| corrupt(&row.order_id, e))?,
            size: SizeLabel::parse(&row.size).map_err(|e| corrupt(&row.order_id, e))?,
            quantity: row.quantity.max(0).unsigned_abs(),
            name: row.name,
            image: row.image,
        })
    }
}

impl OrderRow {
    fn into_order(self, items: Vec<CartLine>) -> Result<Order, RepositoryError> {
        let status: OrderStatus = self.status.parse().map_err(|e| corrupt(&self.id, e))?;
        let total = Price::new(self.total).map_err(|e| corrupt(&self.id, e))?;
        Ok(Order {
            id: OrderId::new(self.id),
            created_at: self.created_at,
            status,
            customer: ContactDetails {
                name: self.customer_name,
                last_name: self.customer_last_name,
                phone: self.phone,
                address: self.address,
                postal_code: self.postal_code,
                notes: self.notes,
            },
            items,
            total,
        })
    }
}

/// Repository for persisted orders.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert an order and its lines.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the id is already taken.
    #[instrument(skip(self, order), fields(order_id = %order.id))]
    pub async fn insert(&self, order: &Order) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO orders (id, customer_name, customer_last_name, phone, address, \
                                 postal_code, notes, total, status, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
        )
        .bind(order.id.as_str())
        .bind(order.customer.name.trim())
        .bind(order.customer.last_name.trim())
        .bind(order.customer.phone.trim())
        .bind(order.customer.address.trim())
        .bind(order.customer.postal_code.trim())
        .bind(order.customer.notes())
        .bind(order.total.amount())
        .bind(order.status.as_str())
        .bind(order.created_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| RepositoryError::from_write(e, "order id"))?;

        for (position, line) in (0_i32..).zip(&order.items) {
            sqlx::query(
                "INSERT INTO order_items (order_id, position, product_id, name, size, \
                                          quantity, price, image) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
            )
            .bind(order.id.as_str())
            .bind(position)
            .bind(line.product_id.as_i32())
            .bind(&line.name)
            .bind(line.size.as_str())
            .bind(i32::try_from(line.quantity).unwrap_or(i32::MAX))
            .bind(line.price.amount())
            .bind(line.image.as_deref())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// All orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Order>, RepositoryError> {
        let rows: Vec<OrderRow> = sqlx::query_as(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders ORDER BY created_at DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        self.attach_items(rows).await
    }

    /// One order by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    #[instrument(skip(self), fields(order_id = %id))]
    pub async fn get(&self, id: &OrderId) -> Result<Option<Order>, RepositoryError> {
        let row: Option<OrderRow> =
            sqlx::query_as(&format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"))
                .bind(id.as_str())
                .fetch_optional(self.pool)
                .await?;

        match row {
            Some(row) => Ok(self.attach_items(vec![row]).await?.into_iter().next()),
            None => Ok(None),
        }
    }

    /// Set an order's status. Any status may follow any other.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no order has this id.
    #[instrument(skip(self), fields(order_id = %id, status = %status))]
    pub async fn update_status(
        &self,
        id: &OrderId,
        status: OrderStatus,
    ) -> Result<Order, RepositoryError> {
        let result = sqlx::query("UPDATE orders SET status = $2 WHERE id = $1")
            .bind(id.as_str())
            .bind(status.as_str())
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        self.get(id).await?.ok_or(RepositoryError::NotFound)
    }

    async fn attach_items(&self, rows: Vec<OrderRow>) -> Result<Vec<Order>, RepositoryError> {
        let ids: Vec<String> = rows.iter().map(|r| r.id.clone()).collect();
        let items: Vec<OrderItemRow> = if ids.is_empty() {
            Vec::new()
        } else {
            sqlx::query_as(
                "SELECT order_id, product_id, name, size, quantity, price, image \
                 FROM order_items WHERE order_id = ANY($1) ORDER BY order_id, position",
            )
            .bind(&ids)
            .fetch_all(self.pool)
            .await?
        };

        let mut by_order: HashMap<String, Vec<CartLine>> = HashMap::new();
        for item in items {
            let order_id = item.order_id.clone();
            by_order.entry(order_id).or_default().push(CartLine::try_from(item)?);
        }

        rows.into_iter()
            .map(|row| {
                let items = by_order.remove(&row.id).unwrap_or_default();
                row.into_order(items)
            })
            .collect()
    }
}
