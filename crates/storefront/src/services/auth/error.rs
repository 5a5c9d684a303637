//! Login and registration failures.

use thiserror::Error;

use crate::db::RepositoryError;

/// Why a login or registration was refused.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("{0:?} is not an email address")]
    InvalidEmail(String),

    /// Unknown email or wrong password; callers cannot tell which.
    #[error("email or password is incorrect")]
    InvalidCredentials,

    #[error("a profile with this email already exists")]
    EmailTaken,

    #[error("password must be at least {min_length} characters")]
    WeakPassword { min_length: usize },

    #[error("profile store failed: {0}")]
    Repository(#[from] RepositoryError),

    #[error("could not hash password: {0}")]
    PasswordHash(String),
}
