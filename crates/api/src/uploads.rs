//! Multipart enrollment forms and concurrent photo uploads.
//!
//! Create and edit requests arrive as `multipart/form-data`: text parts for
//! the record's columns plus one file part per photo role. [`EntityForm`]
//! reads and validates the whole form up front, so a bad photo is rejected
//! before anything touches the image store. [`store_photos`] then writes an
//! entity's photos concurrently; the first failure aborts the submission.

use std::collections::HashMap;

use axum::extract::Multipart;
use futures::future::try_join_all;
use schoolerp_core::entity::{EntityKind, PhotoRole};
use schoolerp_core::media::{photo_key, validate_photo};
use schoolerp_core::types::EntityId;
use schoolerp_core::validation::clean_text;
use schoolerp_storage::{ImageStore, UploadError};

use crate::error::{AppError, AppResult};

/// A validated photo waiting to be uploaded.
#[derive(Debug, Clone)]
pub struct PhotoUpload {
    pub role: PhotoRole,
    /// Derived from the validated content type, never the client file name.
    pub extension: &'static str,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// A fully buffered enrollment form.
#[derive(Debug, Default)]
pub struct EntityForm {
    fields: HashMap<String, String>,
    photos: Vec<PhotoUpload>,
}

impl EntityForm {
    /// Drain `multipart`, keeping text parts and validated photos.
    ///
    /// Empty file parts (a file input left blank) are ignored. A file part
    /// for a role `kind` does not accept is a bad request; unknown text
    /// parts are ignored.
    pub async fn read(mut multipart: Multipart, kind: EntityKind) -> AppResult<Self> {
        let mut form = Self::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?
        {
            let name = field.name().unwrap_or("").to_string();

            if let Some(role) = PhotoRole::from_form_field(&name) {
                if !kind.photo_roles().contains(&role) {
                    return Err(AppError::BadRequest(format!(
                        "A {} has no '{name}' photo",
                        kind.name()
                    )));
                }
                let has_file_name = field.file_name().is_some_and(|n| !n.is_empty());
                let content_type = field.content_type().map(str::to_string);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;

                if bytes.is_empty() && !has_file_name {
                    continue;
                }
                let extension = validate_photo(&name, content_type.as_deref(), bytes.len())?;

                form.photos.retain(|p| p.role != role);
                form.photos.push(PhotoUpload {
                    role,
                    extension,
                    content_type: content_type.unwrap_or_default(),
                    bytes: bytes.to_vec(),
                });
            } else {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                form.fields.insert(name, clean_text(&text));
            }
        }

        Ok(form)
    }

    /// Trimmed value of a text part, if it was sent.
    pub fn text(&self, name: &str) -> Option<String> {
        self.fields.get(name).cloned()
    }

    /// Trimmed value of a text part, or empty when it was not sent.
    pub fn text_or_empty(&self, name: &str) -> String {
        self.fields.get(name).cloned().unwrap_or_default()
    }

    pub fn into_photos(self) -> Vec<PhotoUpload> {
        self.photos
    }
}

/// Public URLs of the photos written for one submission.
#[derive(Debug, Default)]
pub struct StoredPhotos(HashMap<PhotoRole, String>);

impl StoredPhotos {
    pub fn url(&self, role: PhotoRole) -> Option<String> {
        self.0.get(&role).cloned()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Upload every photo for `(kind, id)` concurrently.
///
/// Objects already written when another upload fails are left in place;
/// the orphan sweep reclaims them if no record ever claims the id.
pub async fn store_photos(
    images: &dyn ImageStore,
    kind: EntityKind,
    id: EntityId,
    photos: Vec<PhotoUpload>,
) -> Result<StoredPhotos, UploadError> {
    if photos.is_empty() {
        return Ok(StoredPhotos::default());
    }

    let bucket = kind.bucket();
    let uploads = photos.into_iter().map(|photo| async move {
        let key = photo_key(id, photo.role, photo.extension);
        let url = images
            .upload(bucket, &key, photo.bytes, &photo.content_type)
            .await?;
        Ok::<_, UploadError>((photo.role, url))
    });

    match try_join_all(uploads).await {
        Ok(urls) => {
            tracing::debug!(%kind, %id, count = urls.len(), "Photos uploaded");
            Ok(StoredPhotos(urls.into_iter().collect()))
        }
        Err(e) => {
            tracing::warn!(%kind, %id, error = %e, "Photo upload failed, aborting submission");
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use schoolerp_storage::MemoryImageStore;

    use super::*;

    fn photo(role: PhotoRole) -> PhotoUpload {
        PhotoUpload {
            role,
            extension: "png",
            content_type: "image/png".to_string(),
            bytes: vec![0x89, b'P', b'N', b'G'],
        }
    }

    #[tokio::test]
    async fn stores_each_role_under_the_entity_prefix() {
        let store = MemoryImageStore::new("https://cdn.example");
        let id = schoolerp_core::identity::new_id();

        let stored = store_photos(
            &store,
            EntityKind::Student,
            id,
            vec![
                photo(PhotoRole::SelfPortrait),
                photo(PhotoRole::Mother),
            ],
        )
        .await
        .unwrap();

        assert_eq!(stored.len(), 2);
        assert_eq!(
            stored.url(PhotoRole::SelfPortrait).unwrap(),
            format!("https://cdn.example/student-photos/{id}/self.png")
        );
        assert!(stored.url(PhotoRole::Father).is_none());
        assert!(store
            .get("student-photos", &format!("{id}/mother.png"))
            .await
            .is_some());
    }

    #[tokio::test]
    async fn first_failure_aborts() {
        let store = MemoryImageStore::new("https://cdn.example");
        store.fail_on("/mother.").await;

        let result = store_photos(
            &store,
            EntityKind::Student,
            schoolerp_core::identity::new_id(),
            vec![
                photo(PhotoRole::SelfPortrait),
                photo(PhotoRole::Mother),
            ],
        )
        .await;

        assert_matches!(result, Err(UploadError::Rejected { .. }));
    }

    #[tokio::test]
    async fn no_photos_is_a_no_op() {
        let store = MemoryImageStore::new("https://cdn.example");
        let stored = store_photos(&store, EntityKind::Teacher, schoolerp_core::identity::new_id(), vec![])
            .await
            .unwrap();
        assert!(stored.is_empty());
        assert!(store.is_empty().await);
    }
}
