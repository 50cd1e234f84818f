//! Public identity card handlers.
//!
//! `GET /{kind}/{id}` is the URL encoded in every QR code. It needs no
//! authentication and renders a read-only card, or a friendly 404 page for
//! anything it cannot resolve.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use schoolerp_core::card::IdCard;
use schoolerp_core::entity::EntityKind;
use schoolerp_core::error::CoreError;
use schoolerp_core::identity::parse_id;
use schoolerp_core::profile::ServingOrigin;
use schoolerp_core::types::EntityId;
use schoolerp_db::models::student::Student;
use schoolerp_db::models::teacher::Teacher;
use schoolerp_db::repositories::{StudentRepo, TeacherRepo};

use crate::error::{AppError, AppResult};
use crate::html;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Card assembly
// ---------------------------------------------------------------------------

/// Identity card for a student.
pub fn student_card(student: &Student, origin: &ServingOrigin) -> Result<IdCard, CoreError> {
    IdCard::builder(
        EntityKind::Student,
        student.id,
        &student.name,
        student.photo_url.as_deref(),
        student.created_at,
    )
    .headline(&student.class_name)
    .headline(&student.school_name)
    .section(
        "School Details",
        &[
            ("School Name", student.school_name.as_str()),
            ("School Phone", student.school_phone.as_str()),
            ("School Address", student.school_address.as_str()),
        ],
    )
    .section(
        "Student Details",
        &[
            ("Class", student.class_name.as_str()),
            ("Class Teacher", student.class_teacher.as_str()),
            ("Home Address", student.address.as_str()),
        ],
    )
    .section(
        "Parent Information",
        &[
            ("Father's Phone", student.father_phone.as_str()),
            ("Mother's Phone", student.mother_phone.as_str()),
        ],
    )
    .person("Father", &student.father_name, student.father_photo.as_deref())
    .person("Mother", &student.mother_name, student.mother_photo.as_deref())
    .finish(origin)
}

/// Identity card for a teacher.
pub fn teacher_card(teacher: &Teacher, origin: &ServingOrigin) -> Result<IdCard, CoreError> {
    IdCard::builder(
        EntityKind::Teacher,
        teacher.id,
        &teacher.name,
        teacher.photo_url.as_deref(),
        teacher.created_at,
    )
    .headline(&teacher.qualification)
    .headline(&teacher.experience)
    .section(
        "Professional Details",
        &[
            ("Qualification", teacher.qualification.as_str()),
            ("Teaching Experience", teacher.experience.as_str()),
            ("Home Address", teacher.address.as_str()),
        ],
    )
    .section(
        "School Information",
        &[
            ("School Name", teacher.school_name.as_str()),
            ("School Address", teacher.school_address.as_str()),
        ],
    )
    .finish(origin)
}

/// Parse route segments into a kind and id.
fn resolve(kind: &str, id: &str) -> Result<(EntityKind, EntityId), CoreError> {
    Ok((EntityKind::from_name(kind)?, parse_id(id)?))
}

async fn load_card(state: &AppState, kind: EntityKind, id: EntityId) -> AppResult<IdCard> {
    let origin = &state.config.public_origin;
    let card = match kind {
        EntityKind::Student => StudentRepo::find_by_id(&state.pool, id)
            .await?
            .map(|s| student_card(&s, origin)),
        EntityKind::Teacher => TeacherRepo::find_by_id(&state.pool, id)
            .await?
            .map(|t| teacher_card(&t, origin)),
    };

    match card {
        Some(card) => Ok(card?),
        None => Err(AppError::Core(CoreError::NotFound {
            entity: kind.label(),
            id,
        })),
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /{kind}/{id}
///
/// Unknown kind, malformed id and missing record all render the 404 page.
pub async fn profile_page(
    State(state): State<AppState>,
    Path((kind, id)): Path<(String, String)>,
) -> Response {
    let (kind, id) = match resolve(&kind, &id) {
        Ok(resolved) => resolved,
        Err(_) => return not_found_page(),
    };

    match load_card(&state, kind, id).await {
        Ok(card) => Html(html::render_card_page(&card)).into_response(),
        Err(AppError::Core(CoreError::NotFound { .. })) => not_found_page(),
        Err(e) => e.into_response(),
    }
}

/// GET /api/v1/profiles/{kind}/{id}
pub async fn get_profile(
    State(state): State<AppState>,
    Path((kind, id)): Path<(String, String)>,
) -> AppResult<Json<DataResponse<IdCard>>> {
    let (kind, id) = resolve(&kind, &id)?;
    let card = load_card(&state, kind, id).await?;
    Ok(Json(DataResponse { data: card }))
}

fn not_found_page() -> Response {
    (StatusCode::NOT_FOUND, Html(html::render_not_found_page())).into_response()
}
