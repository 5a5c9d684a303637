//! Profile repository.
//!
//! Profiles hold login credentials and the role that decides admin access.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::instrument;
use zeltic_core::{UserId, UserRole};

use super::RepositoryError;
use crate::models::user::Profile;

#[derive(Debug, FromRow)]
struct ProfileRow {
    id: i32,
    email: String,
    name: String,
    role: String,
    created_at: DateTime<Utc>,
}

impl From<ProfileRow> for Profile {
    fn from(row: ProfileRow) -> Self {
        Self {
            id: UserId::new(row.id),
            email: row.email,
            name: row.name,
            role: UserRole::from(row.role.as_str()),
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct ProfileWithHashRow {
    #[sqlx(flatten)]
    profile: ProfileRow,
    password_hash: String,
}

/// Repository for user profiles.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a profile and its password hash by email (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn get_password_hash(
        &self,
        email: &str,
    ) -> Result<Option<(Profile, String)>, RepositoryError> {
        let row: Option<ProfileWithHashRow> = sqlx::query_as(
            "SELECT id, email, name, role, created_at, password_hash \
             FROM profiles WHERE lower(email) = lower($1)",
        )
        .bind(email.trim())
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(|r| (Profile::from(r.profile), r.password_hash)))
    }

    /// Current role of a profile, `None` if the profile no longer exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self), fields(user_id = %id))]
    pub async fn get_role(&self, id: UserId) -> Result<Option<UserRole>, RepositoryError> {
        let role: Option<String> = sqlx::query_scalar("SELECT role FROM profiles WHERE id = $1")
            .bind(id.as_i32())
            .fetch_optional(self.pool)
            .await?;

        Ok(role.as_deref().map(UserRole::from))
    }

    /// Create a profile.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email is already registered.
    #[instrument(skip(self, password_hash))]
    pub async fn create(
        &self,
        email: &str,
        name: &str,
        password_hash: &str,
        role: UserRole,
    ) -> Result<Profile, RepositoryError> {
        let row: ProfileRow = sqlx::query_as(
            "INSERT INTO profiles (email, name, password_hash, role) \
             VALUES ($1, $2, $3, $4) \
             RETURNING id, email, name, role, created_at",
        )
        .bind(email.trim())
        .bind(name.trim())
        .bind(password_hash)
        .bind(role.as_str())
        .fetch_one(self.pool)
        .await
        .map_err(|e| RepositoryError::from_write(e, "email already exists"))?;

        Ok(row.into())
    }
}
