//! Student entity model and DTOs.

use schoolerp_core::types::{EntityId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `students` table.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct Student {
    pub id: EntityId,
    pub name: String,
    pub photo_url: Option<String>,
    pub father_name: String,
    pub father_photo: Option<String>,
    pub mother_name: String,
    pub mother_photo: Option<String>,
    pub father_phone: String,
    pub mother_phone: String,
    pub address: String,
    pub school_name: String,
    pub school_phone: String,
    pub school_address: String,
    pub class_name: String,
    pub class_teacher: String,
    pub created_at: Timestamp,
}

/// DTO for inserting a student. The id is assigned before photos are
/// uploaded, so it arrives here rather than being generated by the database.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateStudent {
    pub id: EntityId,
    pub name: String,
    pub photo_url: Option<String>,
    #[serde(default)]
    pub father_name: String,
    pub father_photo: Option<String>,
    #[serde(default)]
    pub mother_name: String,
    pub mother_photo: Option<String>,
    #[serde(default)]
    pub father_phone: String,
    #[serde(default)]
    pub mother_phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub school_name: String,
    #[serde(default)]
    pub school_phone: String,
    #[serde(default)]
    pub school_address: String,
    pub class_name: String,
    #[serde(default)]
    pub class_teacher: String,
}

/// DTO for editing a student. `None` leaves a column unchanged; the id is
/// not editable.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateStudent {
    pub name: Option<String>,
    pub photo_url: Option<String>,
    pub father_name: Option<String>,
    pub father_photo: Option<String>,
    pub mother_name: Option<String>,
    pub mother_photo: Option<String>,
    pub father_phone: Option<String>,
    pub mother_phone: Option<String>,
    pub address: Option<String>,
    pub school_name: Option<String>,
    pub school_phone: Option<String>,
    pub school_address: Option<String>,
    pub class_name: Option<String>,
    pub class_teacher: Option<String>,
}

/// Listing filter. `search` matches name, class, school or father's name.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StudentFilter {
    pub search: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
