//! Route definitions for news articles.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::news;
use crate::state::AppState;

/// Public routes mounted at `/news`.
///
/// ```text
/// GET  /          -> list_public (?page=)
/// GET  /{id}      -> get_public
/// ```
pub fn public_router() -> Router<AppState> {
    Router::new()
        .route("/", get(news::list_public))
        .route("/{id}", get(news::get_public))
}

/// Staff routes mounted at `/admin/news`.
///
/// ```text
/// GET    /                       -> list
/// POST   /                       -> create (multipart)
/// GET    /{id}                   -> get_by_id
/// PUT    /{id}                   -> update (multipart)
/// DELETE /{id}                   -> delete
/// POST   /{id}/toggle-publish    -> toggle_publish_state
/// ```
pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/", get(news::list).post(news::create))
        .route(
            "/{id}",
            get(news::get_by_id).put(news::update).delete(news::delete),
        )
        .route("/{id}/toggle-publish", post(news::toggle_publish_state))
}
