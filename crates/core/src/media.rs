//! Photo upload policy and object key layout.
//!
//! Every photo for one entity lives under a common `{id}/` prefix inside the
//! kind's bucket, so all of an entity's objects can be found (and swept)
//! from the id alone:
//!
//! ```text
//! student-photos/{id}/self.jpg
//! student-photos/{id}/father.png
//! student-photos/{id}/mother.webp
//! teacher-photos/{id}/self.jpg
//! ```

use crate::entity::PhotoRole;
use crate::error::CoreError;
use crate::types::EntityId;

/// Largest accepted photo (5 MiB).
pub const MAX_PHOTO_BYTES: usize = 5 * 1024 * 1024;

/// Accepted photo types and the extension each is stored under. The
/// extension always comes from this table, never from the client's file name.
const PHOTO_TYPES: &[(&str, &str)] = &[
    ("image/jpeg", "jpg"),
    ("image/jpg", "jpg"),
    ("image/pjpeg", "jpg"),
    ("image/png", "png"),
    ("image/gif", "gif"),
    ("image/webp", "webp"),
];

/// Validate an uploaded photo before anything is written to the store.
///
/// The content type must be one of the raster types in `PHOTO_TYPES` and
/// the payload must be non-empty and at most [`MAX_PHOTO_BYTES`]. Returns
/// the extension the photo is stored under.
pub fn validate_photo(
    field: &str,
    content_type: Option<&str>,
    len: usize,
) -> Result<&'static str, CoreError> {
    let content_type = content_type.unwrap_or("");
    let Some(extension) = photo_extension(content_type) else {
        return Err(CoreError::Validation(format!(
            "'{field}' must be a JPEG, PNG, GIF or WebP image (got content type '{content_type}')"
        )));
    };
    if len == 0 {
        return Err(CoreError::Validation(format!("'{field}' is empty")));
    }
    if len > MAX_PHOTO_BYTES {
        return Err(CoreError::Validation(format!(
            "'{field}' is {len} bytes; photos must be at most 5MB"
        )));
    }
    Ok(extension)
}

/// Object extension for an accepted content type, ignoring case and any
/// `;` parameters. `None` for anything outside `PHOTO_TYPES`.
pub fn photo_extension(content_type: &str) -> Option<&'static str> {
    let essence = content_type.split(';').next().unwrap_or("").trim();
    PHOTO_TYPES
        .iter()
        .find(|(mime, _)| mime.eq_ignore_ascii_case(essence))
        .map(|&(_, ext)| ext)
}

/// Object key for one role's photo: `{id}/{role}.{ext}`.
pub fn photo_key(id: EntityId, role: PhotoRole, extension: &str) -> String {
    format!("{id}/{}.{extension}", role.name())
}

/// Common prefix of every object belonging to `id`.
pub fn entity_prefix(id: EntityId) -> String {
    format!("{id}/")
}

/// Recover the owning entity id from an object key, if it follows the layout.
pub fn entity_id_from_key(key: &str) -> Option<EntityId> {
    let (prefix, _) = key.split_once('/')?;
    uuid::Uuid::parse_str(prefix).ok()
}
