pub mod auth;
pub mod dashboard;
pub mod health;
pub mod profile;
pub mod qr;
pub mod students;
pub mod teachers;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                                      login (public)
///
/// /admin/dashboard                                 record counts (admin)
///
/// /admin/students                                  list, create (admin)
/// /admin/students/{id}                             get, update, delete (admin)
///
/// /admin/teachers                                  list, create (admin)
/// /admin/teachers/{id}                             get, update, delete (admin)
///
/// /profiles/{kind}/{id}                            identity card JSON (public)
///
/// /qr/{kind}/{id}                                  QR code image (public)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/admin/dashboard", dashboard::router())
        .nest("/admin/students", students::router())
        .nest("/admin/teachers", teachers::router())
        .nest("/profiles", profile::api_router())
        .nest("/qr", qr::router())
}
