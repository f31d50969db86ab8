//! Route definitions for contact messages.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::contact;
use crate::state::AppState;

/// Public routes mounted at `/contact`.
///
/// ```text
/// POST /          -> submit
/// ```
pub fn public_router() -> Router<AppState> {
    Router::new().route("/", post(contact::submit))
}

/// Admin routes mounted at `/admin/contact`.
///
/// ```text
/// GET    /                    -> list (?page=&filter=)
/// POST   /bulk-delete         -> bulk_delete
/// GET    /export              -> export (?lang=)
/// GET    /{id}                -> get_by_id (marks read)
/// DELETE /{id}                -> delete
/// POST   /{id}/mark-read      -> mark_read
/// POST   /{id}/mark-unread    -> mark_unread
/// POST   /{id}/toggle-read    -> toggle_read
/// ```
pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/", get(contact::list))
        .route("/bulk-delete", post(contact::bulk_delete))
        .route("/export", get(contact::export))
        .route("/{id}", get(contact::get_by_id).delete(contact::delete))
        .route("/{id}/mark-read", post(contact::mark_read))
        .route("/{id}/mark-unread", post(contact::mark_unread))
        .route("/{id}/toggle-read", post(contact::toggle_read))
}
