//! Route definitions for the staff back office.

use axum::routing::get;
use axum::Router;

use crate::handlers::dashboard;
use crate::routes::{contact, news, projects};
use crate::state::AppState;

/// Routes mounted at `/admin`.
///
/// ```text
/// GET  /dashboard     -> summary
/// /news/...           -> news::admin_router
/// /projects/...       -> projects::admin_router
/// /contact/...        -> contact::admin_router
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(dashboard::summary))
        .nest("/news", news::admin_router())
        .nest("/projects", projects::admin_router())
        .nest("/contact", contact::admin_router())
}
