//! Registration, login, logout and identity routes.
//!
//! Signing in or out only touches the identity part of the session; the cart
//! is kept across both.

use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::{info, instrument};
use zeltic_core::UserRole;

use crate::error::{AppError, Result, clear_sentry_user, set_sentry_user};
use crate::middleware::{RequireAuth, clear_current_user, set_current_user};
use crate::models::CurrentUser;
use crate::services::{AuthError, AuthService};
use crate::state::AppState;

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Registration request body.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

impl RegisterRequest {
    /// Display name stored on the profile.
    fn full_name(&self) -> String {
        [self.first_name.trim(), self.last_name.trim()]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Create a customer profile and sign it in.
#[instrument(skip(state, session, request), fields(email = %request.email))]
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<CurrentUser>)> {
    let profile = AuthService::new(state.pool())
        .register(
            &request.email,
            &request.full_name(),
            &request.password,
            UserRole::Customer,
        )
        .await?;

    let user = CurrentUser::from(&profile);
    set_current_user(&session, &user).await?;
    set_sentry_user(&user.id, Some(&user.email));
    info!(user_id = %user.id, "Customer registered");

    Ok((StatusCode::CREATED, Json(user)))
}

/// Verify credentials and store the identity in the session.
#[instrument(skip(state, session, request), fields(email = %request.email))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<LoginRequest>,
) -> Result<Json<CurrentUser>> {
    let profile = AuthService::new(state.pool())
        .login_with_password(&request.email, &request.password)
        .await
        .map_err(|e| {
            if matches!(e, AuthError::InvalidCredentials) {
                info!("Login refused: invalid credentials");
            }
            AppError::from(e)
        })?;

    let user = CurrentUser::from(&profile);
    set_current_user(&session, &user).await?;
    set_sentry_user(&user.id, Some(&user.email));
    info!(user_id = %user.id, role = %user.role, "User signed in");

    Ok(Json(user))
}

/// Drop the identity. The cart stays in the session.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Result<StatusCode> {
    clear_current_user(&session).await?;
    clear_sentry_user();
    Ok(StatusCode::NO_CONTENT)
}

/// The signed-in identity.
pub async fn me(RequireAuth(user): RequireAuth) -> Json<CurrentUser> {
    Json(user)
}
