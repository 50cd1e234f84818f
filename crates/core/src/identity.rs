//! Permanent identifiers for students and teachers.
//!
//! An identifier is assigned once, at creation, and is the only key used
//! for both repository lookups and the QR-encoded profile path. It is never
//! rewritten by an edit.

use uuid::Uuid;

use crate::error::CoreError;
use crate::types::EntityId;

/// Issue a fresh identifier (122 random bits, UUID version 4).
pub fn new_id() -> EntityId {
    Uuid::new_v4()
}

/// Parse the textual form of an identifier.
///
/// Accepts upper- or lower-case hex (the identity card displays ids
/// upper-cased, so a hand-typed id may arrive that way).
pub fn parse_id(raw: &str) -> Result<EntityId, CoreError> {
    Uuid::parse_str(raw.trim())
        .map_err(|_| CoreError::Validation(format!("'{raw}' is not a valid identifier")))
}
