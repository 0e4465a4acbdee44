//! JWT-based authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use labelstack_core::annotation::Actor;
use labelstack_core::error::CoreError;
use labelstack_core::permissions::{permissions_for_role, Permission};
use labelstack_core::types::DbId;
use labelstack_db::repositories::UserRepo;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated user resolved from a Bearer token.
///
/// Role and organization come from the user's current row, so a role change
/// or deactivation takes effect without waiting for token expiry.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: DbId,
    /// One of the names in `labelstack_core::roles`.
    pub role: String,
    pub organization_id: DbId,
}

impl AuthUser {
    /// Capabilities granted by the user's role.
    pub fn permissions(&self) -> &'static [Permission] {
        permissions_for_role(&self.role)
    }

    pub fn actor(&self) -> Actor {
        Actor {
            user_id: self.user_id,
            organization_id: self.organization_id,
        }
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing Authorization header".into(),
                ))
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization format. Expected: Bearer <token>".into(),
            ))
        })?;

        let claims = validate_token(token, &state.config.jwt).map_err(|_| {
            AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
        })?;

        let user = UserRepo::find_active(&state.pool, claims.sub)
            .await?
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized("User is inactive or unknown".into()))
            })?;

        Ok(AuthUser {
            user_id: user.id,
            role: user.role,
            organization_id: user.organization_id,
        })
    }
}
