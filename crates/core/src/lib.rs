//! Zeltic core: cart, stock and checkout domain types.
//!
//! Shared by the `storefront` service and the `cli`. Everything here is pure:
//! no database access, no HTTP, no clock reads except where a caller passes
//! `now` in. The optional `postgres` feature adds `sqlx` encoding for the id
//! newtypes.
//!
//! # Modules
//!
//! - [`types`] - ids, prices, size labels and status enums
//! - [`catalog`] - products joined with inventory, listing filters
//! - [`stock`] - turning a stock count into a selectable quantity range
//! - [`cart`] - the cart state machine
//! - [`checkout`] - contact validation and the chat handoff
//! - [`order`] - recorded orders
//! - [`inventory`] - admin stock edits

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod inventory;
pub mod order;
pub mod stock;
pub mod types;

pub use cart::{CART_NAMESPACE, Cart, CartLine};
pub use catalog::{CatalogFilter, CatalogProduct, InventorySlot, Product, SizeAvailability};
pub use checkout::{
    ChannelError, CheckoutError, ContactDetails, ContactField, Handoff, HandoffChannel,
    HandoffTarget, hand_off,
};
pub use inventory::{PendingStockEdits, StockEdit, clamp_stock};
pub use order::{Order, OrderId};
pub use stock::{StockBound, StockError};
pub use types::*;
