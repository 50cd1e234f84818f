//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A create DTO carrying the caller-assigned id
//! - An update DTO (all `Option` fields) for partial edits
//! - A list filter

pub mod student;
pub mod teacher;
