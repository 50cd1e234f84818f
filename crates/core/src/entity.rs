//! Entity kinds and photo roles.
//!
//! The kind's text form doubles as the public route segment
//! (`/student/{id}`, `/teacher/{id}`), so it must never change once codes
//! have been printed.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Entity kinds
// ---------------------------------------------------------------------------

/// Bucket holding every student's photos (including parents).
pub const STUDENT_PHOTOS_BUCKET: &str = "student-photos";

/// Bucket holding every teacher's photos.
pub const TEACHER_PHOTOS_BUCKET: &str = "teacher-photos";

/// The two kinds of record that carry an identity card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Student,
    Teacher,
}

impl EntityKind {
    pub const ALL: [EntityKind; 2] = [EntityKind::Student, EntityKind::Teacher];

    /// Parse from the route segment.
    pub fn from_name(name: &str) -> Result<Self, CoreError> {
        match name {
            "student" => Ok(Self::Student),
            "teacher" => Ok(Self::Teacher),
            other => Err(CoreError::Validation(format!(
                "Unknown entity kind '{other}'. Must be one of: student, teacher"
            ))),
        }
    }

    /// Route segment and serialized name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Teacher => "teacher",
        }
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Student => "Student",
            Self::Teacher => "Teacher",
        }
    }

    /// Object storage bucket for this kind's photos.
    pub fn bucket(self) -> &'static str {
        match self {
            Self::Student => STUDENT_PHOTOS_BUCKET,
            Self::Teacher => TEACHER_PHOTOS_BUCKET,
        }
    }

    /// Photo roles a record of this kind may carry.
    pub fn photo_roles(self) -> &'static [PhotoRole] {
        match self {
            Self::Student => &[PhotoRole::SelfPortrait, PhotoRole::Father, PhotoRole::Mother],
            Self::Teacher => &[PhotoRole::SelfPortrait],
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Photo roles
// ---------------------------------------------------------------------------

/// Whose face a photo shows. The name is the object's file stem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhotoRole {
    SelfPortrait,
    Father,
    Mother,
}

impl PhotoRole {
    /// Object file stem (`self`, `father`, `mother`).
    pub fn name(self) -> &'static str {
        match self {
            Self::SelfPortrait => "self",
            Self::Father => "father",
            Self::Mother => "mother",
        }
    }

    /// Multipart field carrying this role's file.
    pub fn form_field(self) -> &'static str {
        match self {
            Self::SelfPortrait => "photo",
            Self::Father => "father_photo",
            Self::Mother => "mother_photo",
        }
    }

    /// Role for a multipart field name, if the field is a photo field.
    pub fn from_form_field(field: &str) -> Option<Self> {
        match field {
            "photo" => Some(Self::SelfPortrait),
            "father_photo" => Some(Self::Father),
            "mother_photo" => Some(Self::Mother),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_round_trips_through_name() {
        for kind in EntityKind::ALL {
            assert_eq!(EntityKind::from_name(kind.name()).unwrap(), kind);
        }
        assert!(EntityKind::from_name("admin").is_err());
        assert!(EntityKind::from_name("Student").is_err());
    }

    #[test]
    fn buckets_are_per_kind() {
        assert_eq!(EntityKind::Student.bucket(), "student-photos");
        assert_eq!(EntityKind::Teacher.bucket(), "teacher-photos");
    }

    #[test]
    fn teachers_only_carry_a_self_photo() {
        assert_eq!(EntityKind::Teacher.photo_roles(), &[PhotoRole::SelfPortrait]);
        assert_eq!(EntityKind::Student.photo_roles().len(), 3);
    }

    #[test]
    fn form_fields_map_to_roles() {
        for role in EntityKind::Student.photo_roles() {
            assert_eq!(PhotoRole::from_form_field(role.form_field()), Some(*role));
        }
        assert_eq!(PhotoRole::from_form_field("name"), None);
    }
}
