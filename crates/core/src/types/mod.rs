//! Value types shared by the cart, catalog and order modules.

pub mod id;
pub mod price;
pub mod size;
pub mod status;

pub use id::{ProductId, UserId};
pub use price::{Price, PriceError, format_amount};
pub use size::{EmptySize, SizeLabel};
pub use status::{OrderStatus, UserRole};
