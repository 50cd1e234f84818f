//! Route definitions for the `/qr` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::qr;
use crate::state::AppState;

/// Routes mounted at `/qr`.
///
/// ```text
/// GET /{kind}/{id}    -> get_qr (?format=png|svg&download=bool&label=)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/{kind}/{id}", get(qr::get_qr))
}
