//! Route definitions for projects.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::projects;
use crate::state::AppState;

/// Public routes mounted at `/projects`.
///
/// ```text
/// GET  /          -> list_public (?page=)
/// ```
pub fn public_router() -> Router<AppState> {
    Router::new().route("/", get(projects::list_public))
}

/// Staff routes mounted at `/admin/projects`.
///
/// ```text
/// GET    /                       -> list (?page=&filter=)
/// POST   /                       -> create (multipart)
/// GET    /{id}                   -> get_by_id
/// PUT    /{id}                   -> update (multipart)
/// DELETE /{id}                   -> delete
/// POST   /{id}/toggle-active     -> toggle_active
/// ```
pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/", get(projects::list).post(projects::create))
        .route(
            "/{id}",
            get(projects::get_by_id)
                .put(projects::update)
                .delete(projects::delete),
        )
        .route("/{id}/toggle-active", post(projects::toggle_active))
}
