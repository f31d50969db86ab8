//! Startup bootstrap of the initial admin account.

use nps_core::error::CoreError;
use nps_core::roles::ROLE_ADMIN;
use nps_db::models::user::CreateUser;
use nps_db::repositories::{RoleRepo, UserRepo};
use nps_db::DbPool;

use crate::auth::password::{hash_password, validate_password_strength, MIN_PASSWORD_LENGTH};
use crate::config::AdminBootstrap;
use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    Created,
    /// An account with that email existed; its password and role were reset.
    Refreshed,
}

/// Make sure the configured admin exists, is active and holds the admin role.
pub async fn ensure_admin(pool: &DbPool, admin: &AdminBootstrap) -> AppResult<SeedOutcome> {
    validate_password_strength(&admin.password, MIN_PASSWORD_LENGTH)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let role = RoleRepo::find_by_name(pool, ROLE_ADMIN).await?.ok_or_else(|| {
        AppError::InternalError(format!("Role '{ROLE_ADMIN}' is missing; run migrations"))
    })?;
    let password_hash = hash_password(&admin.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    match UserRepo::find_by_email(pool, &admin.email).await? {
        Some(existing) => {
            UserRepo::update_credentials(pool, existing.id, &password_hash, role.id).await?;
            tracing::info!(user_id = existing.id, email = %admin.email, "Admin account refreshed");
            Ok(SeedOutcome::Refreshed)
        }
        None => {
            let user = UserRepo::create(
                pool,
                &CreateUser {
                    email: admin.email.clone(),
                    full_name: admin.full_name.clone(),
                    password_hash,
                    role_id: role.id,
                },
            )
            .await?;
            tracing::info!(user_id = user.id, email = %admin.email, "Admin account created");
            Ok(SeedOutcome::Created)
        }
    }
}
