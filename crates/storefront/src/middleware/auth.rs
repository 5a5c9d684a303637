//! Authentication extractors.
//!
//! `RequireAuth` only needs a signed-in identity. `RequireAdmin` additionally
//! needs the admin capability, which is checked against `profiles` on the
//! first admin request of a session and cached in the session afterwards.
//! A role change therefore takes effect at the user's next login.

use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use serde_json::json;
use tower_sessions::Session;
use tracing::{info, warn};
use zeltic_core::PendingStockEdits;

use crate::db::UserRepository;
use crate::models::{AdminCapability, CurrentUser, session_keys};
use crate::state::AppState;

/// Extractor that requires a signed-in user.
pub struct RequireAuth(pub CurrentUser);

/// Extractor that requires a signed-in user holding the admin capability.
pub struct RequireAdmin(pub CurrentUser);

/// Why an authenticated extractor refused the request.
#[derive(Debug)]
pub enum AuthRejection {
    /// No session or no identity in it.
    Unauthorized,
    /// Signed in, but not an admin.
    Forbidden,
    /// The capability could not be checked.
    Unavailable,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::Unauthorized => (StatusCode::UNAUTHORIZED, "Sign in required"),
            Self::Forbidden => (StatusCode::FORBIDDEN, "Admin access required"),
            Self::Unavailable => (StatusCode::SERVICE_UNAVAILABLE, "Please try again"),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

async fn current_user(parts: &Parts) -> Result<(Session, CurrentUser), AuthRejection> {
    let session = parts
        .extensions
        .get::<Session>()
        .cloned()
        .ok_or(AuthRejection::Unauthorized)?;

    let user: CurrentUser = session
        .get(session_keys::CURRENT_USER)
        .await
        .ok()
        .flatten()
        .ok_or(AuthRejection::Unauthorized)?;

    Ok((session, user))
}

impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let (_, user) = current_user(parts).await?;
        Ok(Self(user))
    }
}

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let (session, user) = current_user(parts).await?;

        let cached: Option<AdminCapability> = session
            .get(session_keys::ADMIN_CAPABILITY)
            .await
            .ok()
            .flatten()
            .filter(|c: &AdminCapability| c.user_id == user.id);

        let capability = match cached {
            Some(capability) => capability,
            None => {
                let role = UserRepository::new(state.pool())
                    .get_role(user.id)
                    .await
                    .map_err(|e| {
                        warn!(error = %e, user_id = %user.id, "Admin capability check failed");
                        AuthRejection::Unavailable
                    })?;
                let capability = AdminCapability {
                    user_id: user.id,
                    granted: role.is_some_and(|r| r.is_admin()),
                };
                info!(user_id = %user.id, granted = capability.granted, "Resolved admin capability");
                if let Err(e) = session
                    .insert(session_keys::ADMIN_CAPABILITY, capability)
                    .await
                {
                    warn!(error = %e, "Failed to cache admin capability");
                }
                capability
            }
        };

        if capability.granted {
            Ok(Self(user))
        } else {
            Err(AuthRejection::Forbidden)
        }
    }
}

/// Store the signed-in identity.
///
/// Any capability cached for a previous identity is dropped.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_user(
    session: &Session,
    user: &CurrentUser,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session
        .remove::<AdminCapability>(session_keys::ADMIN_CAPABILITY)
        .await?;
    session.insert(session_keys::CURRENT_USER, user).await
}

/// Drop the identity, the cached capability and any staged stock edits
/// (logout). The cart stays.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_user(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session
        .remove::<CurrentUser>(session_keys::CURRENT_USER)
        .await?;
    session
        .remove::<AdminCapability>(session_keys::ADMIN_CAPABILITY)
        .await?;
    session
        .remove::<PendingStockEdits>(session_keys::PENDING_STOCK)
        .await?;
    Ok(())
}
