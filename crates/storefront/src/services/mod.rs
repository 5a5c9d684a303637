//! Business logic services for storefront.
//!
//! # Services
//!
//! - `auth` - Password login for profiles
//! - `cart` - Session-bound cart store
//! - `inventory` - Admin stock edits
//! - `orders` - Order book behind the configured backend

pub mod auth;
pub mod cart;
pub mod inventory;
pub mod orders;

pub use auth::{AuthError, AuthService};
pub use cart::{ClientRedirect, SessionCart};
pub use inventory::{BatchReport, InventoryEditor, InventoryError};
pub use orders::OrderBook;
