//! Handlers for the `/admin/teachers` resource.
//!
//! Same flow as students, with a single `photo` file part stored at
//! `teacher-photos/{id}/self.{ext}`.

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use schoolerp_core::entity::{EntityKind, PhotoRole};
use schoolerp_core::error::CoreError;
use schoolerp_core::identity::{new_id, parse_id};
use schoolerp_core::types::EntityId;
use schoolerp_core::validation::{require_non_blank, require_non_blank_if_present};
use schoolerp_db::models::teacher::{CreateTeacher, Teacher, TeacherFilter, UpdateTeacher};
use schoolerp_db::repositories::TeacherRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::query::ListParams;
use crate::response::DataResponse;
use crate::state::AppState;
use crate::uploads::{store_photos, EntityForm};

fn not_found(id: EntityId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Teacher",
        id,
    })
}

/// GET /api/v1/admin/teachers
pub async fn list_teachers(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<Json<DataResponse<Vec<Teacher>>>> {
    let filter = TeacherFilter {
        search: params.search,
        limit: params.limit,
        offset: params.offset,
    };
    let teachers = TeacherRepo::list(&state.pool, &filter).await?;
    Ok(Json(DataResponse { data: teachers }))
}

/// POST /api/v1/admin/teachers
pub async fn create_teacher(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<DataResponse<Teacher>>)> {
    let form = EntityForm::read(multipart, EntityKind::Teacher).await?;

    let id = new_id();
    let mut input = CreateTeacher {
        id,
        name: form.text_or_empty("name"),
        photo_url: None,
        experience: form.text_or_empty("experience"),
        qualification: form.text_or_empty("qualification"),
        school_name: form.text_or_empty("school_name"),
        address: form.text_or_empty("address"),
        school_address: form.text_or_empty("school_address"),
    };
    require_non_blank("Teacher name", &input.name)?;
    require_non_blank("Qualification", &input.qualification)?;

    let photos = store_photos(
        state.images.as_ref(),
        EntityKind::Teacher,
        id,
        form.into_photos(),
    )
    .await?;
    input.photo_url = photos.url(PhotoRole::SelfPortrait);

    let teacher = TeacherRepo::create(&state.pool, &input).await?;
    tracing::info!(teacher_id = %teacher.id, "Teacher added");

    Ok((StatusCode::CREATED, Json(DataResponse { data: teacher })))
}

/// GET /api/v1/admin/teachers/{id}
pub async fn get_teacher(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<DataResponse<Teacher>>> {
    let id = parse_id(&id)?;
    let teacher = TeacherRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: teacher }))
}

/// PUT /api/v1/admin/teachers/{id}
pub async fn update_teacher(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> AppResult<Json<DataResponse<Teacher>>> {
    let id = parse_id(&id)?;
    let form = EntityForm::read(multipart, EntityKind::Teacher).await?;

    let mut input = UpdateTeacher {
        name: form.text("name"),
        experience: form.text("experience"),
        qualification: form.text("qualification"),
        school_name: form.text("school_name"),
        address: form.text("address"),
        school_address: form.text("school_address"),
        ..Default::default()
    };
    require_non_blank_if_present("Teacher name", input.name.as_deref())?;
    require_non_blank_if_present("Qualification", input.qualification.as_deref())?;

    if TeacherRepo::find_by_id(&state.pool, id).await?.is_none() {
        return Err(not_found(id));
    }

    let photos = store_photos(
        state.images.as_ref(),
        EntityKind::Teacher,
        id,
        form.into_photos(),
    )
    .await?;
    input.photo_url = photos.url(PhotoRole::SelfPortrait);

    let teacher = TeacherRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    tracing::info!(teacher_id = %id, "Teacher updated");

    Ok(Json(DataResponse { data: teacher }))
}

/// DELETE /api/v1/admin/teachers/{id}
pub async fn delete_teacher(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    let id = parse_id(&id)?;
    if TeacherRepo::delete(&state.pool, id).await? {
        tracing::info!(teacher_id = %id, "Teacher deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}
