//! Teacher entity model and DTOs.

use schoolerp_core::types::{EntityId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `teachers` table.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct Teacher {
    pub id: EntityId,
    pub name: String,
    pub photo_url: Option<String>,
    pub experience: String,
    pub qualification: String,
    pub school_name: String,
    pub address: String,
    pub school_address: String,
    pub created_at: Timestamp,
}

/// DTO for inserting a teacher with a caller-assigned id.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTeacher {
    pub id: EntityId,
    pub name: String,
    pub photo_url: Option<String>,
    #[serde(default)]
    pub experience: String,
    pub qualification: String,
    #[serde(default)]
    pub school_name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub school_address: String,
}

/// DTO for editing a teacher. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTeacher {
    pub name: Option<String>,
    pub photo_url: Option<String>,
    pub experience: Option<String>,
    pub qualification: Option<String>,
    pub school_name: Option<String>,
    pub address: Option<String>,
    pub school_address: Option<String>,
}

/// Listing filter. `search` matches name, school or qualification.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TeacherFilter {
    pub search: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
