//! Recorded orders.

use core::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cart::CartLine;
use crate::checkout::{ContactDetails, Handoff};
use crate::types::{OrderStatus, Price};

/// Order identifier, `order-<unix millis>-<7 random chars>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(::sqlx::Type))]
#[cfg_attr(feature = "postgres", sqlx(transparent))]
#[serde(transparent)]
pub struct OrderId(String);

impl OrderId {
    const PREFIX: &'static str = "order-";
    const SUFFIX_LEN: usize = 7;

    /// Generate a fresh id stamped with `now`.
    #[must_use]
    pub fn generate(now: DateTime<Utc>) -> Self {
        let random = uuid::Uuid::new_v4().simple().to_string();
        let suffix: String = random.chars().take(Self::SUFFIX_LEN).collect();
        Self(format!("{}{}-{suffix}", Self::PREFIX, now.timestamp_millis()))
    }

    /// Wrap an id read back from storage or a request path.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A checked-out cart, kept for the admin order list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub created_at: DateTime<Utc>,
    pub status: OrderStatus,
    pub customer: ContactDetails,
    pub items: Vec<CartLine>,
    pub total: Price,
}

impl Order {
    /// A new pending order for a completed handoff.
    #[must_use]
    pub fn from_handoff(handoff: &Handoff, now: DateTime<Utc>) -> Self {
        Self {
            id: OrderId::generate(now),
            created_at: now,
            status: OrderStatus::Pending,
            customer: handoff.contact.clone(),
            items: handoff.lines.clone(),
            total: handoff.total,
        }
    }

    pub const fn set_status(&mut self, status: OrderStatus) {
        self.status = status;
    }

    /// Total number of units across lines.
    #[must_use]
    pub fn unit_count(&self) -> u32 {
        self.items
            .iter()
            .fold(0u32, |acc, line| acc.saturating_add(line.quantity))
    }
}

/// Sort orders newest first; ties keep their relative order.
pub fn sort_newest_first(orders: &mut [Order]) {
    orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}
