//! Order book.
//!
//! Where checkouts are recorded depends on `ORDER_PERSISTENCE_BACKEND`. The
//! `local` book lives in process memory and is shared by every session of
//! this server; it is empty after a restart. The `remote` book reads and
//! writes the `orders` tables.

use std::sync::Arc;

use sqlx::PgPool;
use tokio::sync::RwLock;
use zeltic_core::order::sort_newest_first;
use zeltic_core::{Order, OrderId, OrderStatus};

use crate::config::OrderPersistence;
use crate::db::{OrderRepository, RepositoryError};

/// Recorded orders behind the configured backend.
#[derive(Clone)]
pub enum OrderBook {
    Local(Arc<RwLock<Vec<Order>>>),
    Remote(PgPool),
}

impl OrderBook {
    #[must_use]
    pub fn new(backend: OrderPersistence, pool: &PgPool) -> Self {
        match backend {
            OrderPersistence::Local => Self::Local(Arc::default()),
            OrderPersistence::Remote => Self::Remote(pool.clone()),
        }
    }

    #[must_use]
    pub const fn backend(&self) -> OrderPersistence {
        match self {
            Self::Local(_) => OrderPersistence::Local,
            Self::Remote(_) => OrderPersistence::Remote,
        }
    }

    /// Record a new order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the remote insert fails.
    pub async fn record(&self, order: Order) -> Result<(), RepositoryError> {
        match self {
            Self::Local(orders) => {
                orders.write().await.push(order);
                Ok(())
            }
            Self::Remote(pool) => OrderRepository::new(pool).insert(&order).await,
        }
    }

    /// All orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the remote query fails.
    pub async fn list(&self) -> Result<Vec<Order>, RepositoryError> {
        match self {
            Self::Local(orders) => {
                let mut list = orders.read().await.clone();
                list.reverse();
                sort_newest_first(&mut list);
                Ok(list)
            }
            Self::Remote(pool) => OrderRepository::new(pool).list().await,
        }
    }

    /// One order by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the remote query fails.
    pub async fn get(&self, id: &OrderId) -> Result<Option<Order>, RepositoryError> {
        match self {
            Self::Local(orders) => Ok(orders.read().await.iter().find(|o| o.id == *id).cloned()),
            Self::Remote(pool) => OrderRepository::new(pool).get(id).await,
        }
    }

    /// Set an order's status.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` for an unknown id.
    pub async fn update_status(
        &self,
        id: &OrderId,
        status: OrderStatus,
    ) -> Result<Order, RepositoryError> {
        match self {
            Self::Local(orders) => {
                let mut orders = orders.write().await;
                let order = orders
                    .iter_mut()
                    .find(|o| o.id == *id)
                    .ok_or(RepositoryError::NotFound)?;
                order.set_status(status);
                Ok(order.clone())
            }
            Self::Remote(pool) => OrderRepository::new(pool).update_status(id, status).await,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{Duration, Utc};
    use zeltic_core::{ContactDetails, Price};

    use super::*;

    fn local() -> OrderBook {
        OrderBook::Local(Arc::default())
    }

    fn order(age_minutes: i64) -> Order {
        let at = Utc::now() - Duration::minutes(age_minutes);
        Order {
            id: OrderId::generate(at),
            created_at: at,
            status: OrderStatus::Pending,
            customer: ContactDetails::default(),
            items: Vec::new(),
            total: Price::ZERO,
        }
    }

    #[tokio::test]
    async fn local_lists_newest_first() {
        let book = local();
        let old = order(30);
        let new = order(1);
        book.record(old.clone()).await.unwrap();
        book.record(new.clone()).await.unwrap();

        let ids: Vec<_> = book.list().await.unwrap().into_iter().map(|o| o.id).collect();
        assert_eq!(ids, [new.id, old.id]);
    }

    #[tokio::test]
    async fn local_status_round_trip() {
        let book = local();
        let o = order(0);
        book.record(o.clone()).await.unwrap();

        let done = book.update_status(&o.id, OrderStatus::Completed).await.unwrap();
        assert_eq!(done.status, OrderStatus::Completed);
        let back = book.update_status(&o.id, OrderStatus::Pending).await.unwrap();
        assert_eq!(back.status, OrderStatus::Pending);
        assert_eq!(book.get(&o.id).await.unwrap().unwrap().status, OrderStatus::Pending);
    }

    #[tokio::test]
    async fn unknown_order_is_not_found() {
        let err = local()
            .update_status(&OrderId::new("order-0-missing"), OrderStatus::Cancelled)
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));
    }
}
