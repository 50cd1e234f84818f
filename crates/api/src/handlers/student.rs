//! Handlers for the `/admin/students` resource.
//!
//! Create and edit take `multipart/form-data`. Text parts map onto the
//! student's columns; `photo`, `father_photo` and `mother_photo` file parts
//! are uploaded to `student-photos/{id}/{role}.{ext}` before the row is
//! written.

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use schoolerp_core::entity::{EntityKind, PhotoRole};
use schoolerp_core::error::CoreError;
use schoolerp_core::identity::{new_id, parse_id};
use schoolerp_core::types::EntityId;
use schoolerp_core::validation::{require_non_blank, require_non_blank_if_present};
use schoolerp_db::models::student::{CreateStudent, Student, StudentFilter, UpdateStudent};
use schoolerp_db::repositories::StudentRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::query::ListParams;
use crate::response::DataResponse;
use crate::state::AppState;
use crate::uploads::{store_photos, EntityForm};

fn not_found(id: EntityId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Student",
        id,
    })
}

/// GET /api/v1/admin/students
///
/// Newest first. `search` matches name, class, school or father's name.
pub async fn list_students(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<Json<DataResponse<Vec<Student>>>> {
    let filter = StudentFilter {
        search: params.search,
        limit: params.limit,
        offset: params.offset,
    };
    let students = StudentRepo::list(&state.pool, &filter).await?;
    Ok(Json(DataResponse { data: students }))
}

/// POST /api/v1/admin/students
///
/// Validates the form, assigns a new id, uploads all photos concurrently and
/// only then inserts the row. Any upload failure aborts with 502 and no row.
pub async fn create_student(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<DataResponse<Student>>)> {
    let form = EntityForm::read(multipart, EntityKind::Student).await?;

    let id = new_id();
    let mut input = CreateStudent {
        id,
        name: form.text_or_empty("name"),
        photo_url: None,
        father_name: form.text_or_empty("father_name"),
        father_photo: None,
        mother_name: form.text_or_empty("mother_name"),
        mother_photo: None,
        father_phone: form.text_or_empty("father_phone"),
        mother_phone: form.text_or_empty("mother_phone"),
        address: form.text_or_empty("address"),
        school_name: form.text_or_empty("school_name"),
        school_phone: form.text_or_empty("school_phone"),
        school_address: form.text_or_empty("school_address"),
        class_name: form.text_or_empty("class_name"),
        class_teacher: form.text_or_empty("class_teacher"),
    };
    require_non_blank("Student name", &input.name)?;
    require_non_blank("Class", &input.class_name)?;

    let photos = store_photos(
        state.images.as_ref(),
        EntityKind::Student,
        id,
        form.into_photos(),
    )
    .await?;
    input.photo_url = photos.url(PhotoRole::SelfPortrait);
    input.father_photo = photos.url(PhotoRole::Father);
    input.mother_photo = photos.url(PhotoRole::Mother);

    let student = StudentRepo::create(&state.pool, &input).await?;
    tracing::info!(student_id = %student.id, photos = photos.len(), "Student enrolled");

    Ok((StatusCode::CREATED, Json(DataResponse { data: student })))
}

/// GET /api/v1/admin/students/{id}
pub async fn get_student(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<DataResponse<Student>>> {
    let id = parse_id(&id)?;
    let student = StudentRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: student }))
}

/// PUT /api/v1/admin/students/{id}
///
/// Partial update: only parts present in the form change. A new photo is
/// uploaded to the role's key, replacing the previous object when the
/// extension matches. The id never changes, so printed QR codes stay valid.
pub async fn update_student(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> AppResult<Json<DataResponse<Student>>> {
    let id = parse_id(&id)?;
    let form = EntityForm::read(multipart, EntityKind::Student).await?;

    let mut input = UpdateStudent {
        name: form.text("name"),
        father_name: form.text("father_name"),
        mother_name: form.text("mother_name"),
        father_phone: form.text("father_phone"),
        mother_phone: form.text("mother_phone"),
        address: form.text("address"),
        school_name: form.text("school_name"),
        school_phone: form.text("school_phone"),
        school_address: form.text("school_address"),
        class_name: form.text("class_name"),
        class_teacher: form.text("class_teacher"),
        ..Default::default()
    };
    require_non_blank_if_present("Student name", input.name.as_deref())?;
    require_non_blank_if_present("Class", input.class_name.as_deref())?;

    // Never upload photos for an id that has no record.
    if StudentRepo::find_by_id(&state.pool, id).await?.is_none() {
        return Err(not_found(id));
    }

    let photos = store_photos(
        state.images.as_ref(),
        EntityKind::Student,
        id,
        form.into_photos(),
    )
    .await?;
    input.photo_url = photos.url(PhotoRole::SelfPortrait);
    input.father_photo = photos.url(PhotoRole::Father);
    input.mother_photo = photos.url(PhotoRole::Mother);

    let student = StudentRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    tracing::info!(student_id = %id, photos = photos.len(), "Student updated");

    Ok(Json(DataResponse { data: student }))
}

/// DELETE /api/v1/admin/students/{id}
///
/// Removes the record only. Its photos are reclaimed by the orphan sweep.
pub async fn delete_student(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    let id = parse_id(&id)?;
    if StudentRepo::delete(&state.pool, id).await? {
        tracing::info!(student_id = %id, "Student deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}
