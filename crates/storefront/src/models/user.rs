//! User domain types.

use chrono::{DateTime, Utc};
use zeltic_core::{UserId, UserRole};

/// A login account.
#[derive(Debug, Clone)]
pub struct Profile {
    pub id: UserId,
    pub email: String,
    pub name: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}
