//! Route definitions for the `/admin/students` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::student;
use crate::state::AppState;

/// Routes mounted at `/admin/students`.
///
/// ```text
/// GET    /        -> list_students
/// POST   /        -> create_student (multipart)
/// GET    /{id}    -> get_student
/// PUT    /{id}    -> update_student (multipart)
/// DELETE /{id}    -> delete_student
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(student::list_students).post(student::create_student),
        )
        .route(
            "/{id}",
            get(student::get_student)
                .put(student::update_student)
                .delete(student::delete_student),
        )
}
