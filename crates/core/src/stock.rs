//! Stock-bound quantity resolution.
//!
//! Turns the stock count of one inventory slot into the quantity range a
//! customer may pick for that size. The bound is only as fresh as the slot it
//! was resolved from: nothing re-resolves it when the stored count changes
//! later, and quantities already in the cart are not subtracted.

use core::ops::RangeInclusive;

use serde::Serialize;

use crate::catalog::InventorySlot;
use crate::types::{ProductId, SizeLabel};

/// Why a size/quantity selection cannot go into the cart.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum StockError {
    /// The customer has not picked a size yet.
    #[error("please select a size")]
    NoSizeSelected,
    /// The product has no stock for the size (or no slot at all).
    #[error("size {0} is out of stock")]
    OutOfStock(SizeLabel),
    /// Quantities start at one.
    #[error("quantity must be at least 1")]
    BelowMinimum,
    /// More units than the slot holds.
    #[error("only {available} units available")]
    ExceedsStock {
        /// Requested quantity.
        requested: u32,
        /// Units in the slot when the bound was resolved.
        available: u32,
    },
}

/// Selectable quantity range for one `(product, size)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum StockBound {
    /// Stepper is pinned to `[1, 1]` and add-to-cart is refused.
    OutOfStock,
    /// Any quantity in `1..=max` may be picked.
    InStock {
        /// Slot stock at resolution time.
        max: u32,
    },
}

impl StockBound {
    /// Smallest quantity the stepper shows.
    pub const MIN_QUANTITY: u32 = 1;

    /// Resolve the bound for `size` from a product's slots.
    #[must_use]
    pub fn resolve(slots: &[InventorySlot], product_id: ProductId, size: &SizeLabel) -> Self {
        slots
            .iter()
            .find(|slot| slot.product_id == product_id && slot.size == *size)
            .map_or(Self::OutOfStock, |slot| Self::from_stock(slot.stock))
    }

    /// Bound for a known stock count.
    #[must_use]
    pub const fn from_stock(stock: u32) -> Self {
        if stock == 0 {
            Self::OutOfStock
        } else {
            Self::InStock { max: stock }
        }
    }

    #[must_use]
    pub const fn is_out_of_stock(&self) -> bool {
        matches!(self, Self::OutOfStock)
    }

    /// Upper end of the stepper; `1` when out of stock.
    #[must_use]
    pub const fn max(&self) -> u32 {
        match self {
            Self::OutOfStock => Self::MIN_QUANTITY,
            Self::InStock { max } => *max,
        }
    }

    /// The stepper range.
    #[must_use]
    pub const fn range(&self) -> RangeInclusive<u32> {
        Self::MIN_QUANTITY..=self.max()
    }

    /// Whether `quantity` may be added to the cart.
    #[must_use]
    pub const fn is_selectable(&self, quantity: u32) -> bool {
        match self {
            Self::OutOfStock => false,
            Self::InStock { max } => quantity >= Self::MIN_QUANTITY && quantity <= *max,
        }
    }

    /// Pull `quantity` into the stepper range.
    #[must_use]
    pub fn clamp(&self, quantity: u32) -> u32 {
        quantity.clamp(Self::MIN_QUANTITY, self.max())
    }

    /// Step up by one; `None` when already at the ceiling.
    #[must_use]
    pub fn increment(&self, quantity: u32) -> Option<u32> {
        (quantity < self.max()).then(|| self.clamp(quantity + 1))
    }

    /// Step down by one; `None` when already at the floor.
    #[must_use]
    pub fn decrement(&self, quantity: u32) -> Option<u32> {
        (quantity > Self::MIN_QUANTITY).then(|| self.clamp(quantity - 1))
    }

    /// Gate an add-to-cart request.
    ///
    /// # Errors
    ///
    /// Returns [`StockError::OutOfStock`] for an empty slot and
    /// [`StockError::BelowMinimum`] / [`StockError::ExceedsStock`] for
    /// quantities outside the range.
    pub fn admit(&self, size: &SizeLabel, quantity: u32) -> Result<u32, StockError> {
        match self {
            Self::OutOfStock => Err(StockError::OutOfStock(size.clone())),
            Self::InStock { .. } if quantity < Self::MIN_QUANTITY => Err(StockError::BelowMinimum),
            Self::InStock { max } if quantity > *max => Err(StockError::ExceedsStock {
                requested: quantity,
                available: *max,
            }),
            Self::InStock { .. } => Ok(quantity),
        }
    }
}
