//! Route definitions for public identity cards.

use axum::routing::get;
use axum::Router;

use crate::handlers::profile;
use crate::state::AppState;

/// The card page at the root, where QR codes point. Mounted outside
/// `/api/v1`.
///
/// ```text
/// GET /{kind}/{id}    -> profile_page (HTML)
/// ```
pub fn page_router() -> Router<AppState> {
    Router::new().route("/{kind}/{id}", get(profile::profile_page))
}

/// Routes mounted at `/profiles`.
///
/// ```text
/// GET /{kind}/{id}    -> get_profile (JSON)
/// ```
pub fn api_router() -> Router<AppState> {
    Router::new().route("/{kind}/{id}", get(profile::get_profile))
}
