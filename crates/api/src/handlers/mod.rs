pub mod auth;
pub mod contact;
pub mod dashboard;
pub mod form;
pub mod news;
pub mod projects;

use nps_core::error::CoreError;
use nps_core::types::DbId;
use serde::Serialize;

use crate::error::AppError;

/// Payload of a successful single-row delete.
#[derive(Debug, Serialize)]
pub struct Deleted {
    pub id: DbId,
}

pub(crate) fn not_found(entity: &'static str, id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity, id })
}
