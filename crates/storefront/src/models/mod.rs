//! Domain models for storefront.

pub mod session;
pub mod user;

pub use session::{AdminCapability, CurrentUser, keys as session_keys};
pub use user::Profile;
