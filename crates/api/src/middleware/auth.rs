//! JWT-based authentication extractors for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use nps_core::authz::CallerContext;
use nps_core::error::CoreError;
use nps_core::roles::Role;
use nps_core::types::DbId;

use crate::auth::jwt::{validate_token, Claims};
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated user extracted from a JWT Bearer token in the `Authorization` header.
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = user.user_id, role = %user.role, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The user's internal database id (from `claims.sub`).
    pub user_id: DbId,
    /// The user's role name (e.g. `"admin"`, `"editor"`).
    pub role: String,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = authorization_header(parts).ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Missing Authorization header".into(),
            ))
        })?;
        let claims = decode_bearer(header, state)?;

        Ok(AuthUser {
            user_id: claims.sub,
            role: claims.role,
        })
    }
}

/// The caller of the current request, for handlers that serve both
/// anonymous and staff callers or that defer the decision to the policy table.
///
/// A missing, malformed or expired `Authorization` header yields an
/// anonymous caller; guarded operations then fail with 401 in `authorize`.
#[derive(Debug, Clone)]
pub struct Caller(pub CallerContext);

impl FromRequestParts<AppState> for Caller {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(header) = authorization_header(parts) else {
            return Ok(Caller(CallerContext::anonymous()));
        };
        match decode_bearer(header, state) {
            Ok(claims) => {
                let roles = Role::parse(&claims.role).into_iter().collect();
                Ok(Caller(CallerContext::authenticated(claims.sub, roles)))
            }
            Err(e) => {
                tracing::debug!(error = %e, "Ignoring unusable bearer token");
                Ok(Caller(CallerContext::anonymous()))
            }
        }
    }
}

fn authorization_header(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
}

fn decode_bearer(header: &str, state: &AppState) -> Result<Claims, AppError> {
    let token = header.strip_prefix("Bearer ").ok_or_else(|| {
        AppError::Core(CoreError::Unauthorized(
            "Invalid Authorization format. Expected: Bearer <token>".into(),
        ))
    })?;

    validate_token(token, &state.config.jwt)
        .map_err(|_| AppError::Core(CoreError::Unauthorized("Invalid or expired token".into())))
}
