//! Admin profile management.
//!
//! The admin capability comes from the profile's role, so creating an admin
//! is creating a profile with `role = 'admin'`.

use thiserror::Error;
use zeltic_core::UserRole;
use zeltic_storefront::services::{AuthError, AuthService};

use super::{CommandError, connect};

/// Errors that can occur during admin operations.
#[derive(Debug, Error)]
pub enum AdminError {
    #[error(transparent)]
    Connect(#[from] CommandError),

    #[error(transparent)]
    Auth(#[from] AuthError),
}

/// Create a new admin profile and return its id.
pub async fn create_user(email: &str, name: &str, password: &str) -> Result<i32, AdminError> {
    let pool = connect().await?;

    tracing::info!("Creating admin profile: {}", email);
    let profile = AuthService::new(&pool)
        .register(email, name, password, UserRole::Admin)
        .await?;

    tracing::info!(
        "Admin profile created! ID: {}, Email: {}, Role: {}",
        profile.id,
        profile.email,
        profile.role
    );

    Ok(profile.id.as_i32())
}
