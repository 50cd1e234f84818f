//! Handlers for the admin dashboard.

use axum::extract::State;
use axum::Json;
use schoolerp_db::repositories::{StudentRepo, TeacherRepo};
use serde::Serialize;

use crate::error::AppResult;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// Record counts shown on the dashboard.
#[derive(Debug, Serialize)]
pub struct DashboardStats {
    pub students: i64,
    pub teachers: i64,
}

/// GET /api/v1/admin/dashboard
pub async fn get_stats(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<DashboardStats>>> {
    let (students, teachers) = tokio::try_join!(
        StudentRepo::count(&state.pool),
        TeacherRepo::count(&state.pool),
    )?;
    Ok(Json(DataResponse {
        data: DashboardStats { students, teachers },
    }))
}
