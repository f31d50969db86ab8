pub mod admin;
pub mod auth;
pub mod contact;
pub mod health;
pub mod news;
pub mod projects;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                                      login (public)
/// /auth/me                                         current identity (requires auth)
///
/// /news                                            public listing (lead + page)
/// /news/{id}                                       public detail
/// /projects                                        public listing (active only)
/// /contact                                         submit message (public)
///
/// /admin/dashboard                                 counters + latest rows (admin)
///
/// /admin/news                                      list, create
/// /admin/news/{id}                                 get, update, delete (delete: admin)
/// /admin/news/{id}/toggle-publish                  flip published flag
///
/// /admin/projects                                  list (?page=&filter=), create
/// /admin/projects/{id}                             get, update, delete (delete: admin)
/// /admin/projects/{id}/toggle-active               flip active flag
///
/// /admin/contact                                   inbox (?page=&filter=) (admin)
/// /admin/contact/bulk-delete                       delete selected ids
/// /admin/contact/export                            CSV download (?lang=)
/// /admin/contact/{id}                              get (marks read), delete
/// /admin/contact/{id}/mark-read                    set read
/// /admin/contact/{id}/mark-unread                  set unread
/// /admin/contact/{id}/toggle-read                  flip read flag
/// ```
///
/// Role checks happen inside each handler against the central policy table.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/news", news::public_router())
        .nest("/projects", projects::public_router())
        .nest("/contact", contact::public_router())
        .nest("/admin", admin::router())
}
