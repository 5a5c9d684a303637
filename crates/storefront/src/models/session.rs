//! Session-related types.
//!
//! The session holds two independent namespaces: the cart snapshot and the
//! signed-in identity. Clearing one never touches the other.

use serde::{Deserialize, Serialize};
use zeltic_core::{UserId, UserRole};

use super::user::Profile;

/// Session-stored user identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: UserId,
    pub email: String,
    pub name: String,
    /// Role at login time. Admin routes re-check it against the database.
    pub role: UserRole,
}

impl From<&Profile> for CurrentUser {
    fn from(profile: &Profile) -> Self {
        Self {
            id: profile.id,
            email: profile.email.clone(),
            name: profile.name.clone(),
            role: profile.role,
        }
    }
}

/// Verified admin capability, cached once per session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminCapability {
    /// Profile the check was made for.
    pub user_id: UserId,
    /// Whether the stored role was `admin`.
    pub granted: bool,
}

/// Session keys.
pub mod keys {
    /// Cart snapshot.
    pub const CART: &str = zeltic_core::CART_NAMESPACE;

    /// Signed-in identity.
    pub const CURRENT_USER: &str = "auth-storage";

    /// Cached [`super::AdminCapability`].
    pub const ADMIN_CAPABILITY: &str = "admin-capability";

    /// Stock edits staged in the admin editor, not yet saved.
    pub const PENDING_STOCK: &str = "admin-pending-stock";
}
