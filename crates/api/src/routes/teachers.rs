//! Route definitions for the `/admin/teachers` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::teacher;
use crate::state::AppState;

/// Routes mounted at `/admin/teachers`.
///
/// ```text
/// GET    /        -> list_teachers
/// POST   /        -> create_teacher (multipart)
/// GET    /{id}    -> get_teacher
/// PUT    /{id}    -> update_teacher (multipart)
/// DELETE /{id}    -> delete_teacher
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(teacher::list_teachers).post(teacher::create_teacher),
        )
        .route(
            "/{id}",
            get(teacher::get_teacher)
                .put(teacher::update_teacher)
                .delete(teacher::delete_teacher),
        )
}
