//! In-process image store.

use std::collections::{BTreeMap, HashSet};

use async_trait::async_trait;
use chrono::Utc;
use schoolerp_core::types::Timestamp;
use tokio::sync::RwLock;

use crate::{join_public_url, validate_key, ImageStore, StoredObject, UploadError};

/// A stored object's bytes and metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryObject {
    pub bytes: Vec<u8>,
    pub content_type: String,
    pub last_modified: Timestamp,
}

/// Keeps objects in a map keyed by `(bucket, key)`.
///
/// Uploads whose key contains a fragment registered with
/// [`MemoryImageStore::fail_on`] are rejected, which lets callers exercise
/// their failure paths.
pub struct MemoryImageStore {
    public_base_url: String,
    objects: RwLock<BTreeMap<(String, String), MemoryObject>>,
    failing_fragments: RwLock<HashSet<String>>,
}

impl MemoryImageStore {
    pub fn new(public_base_url: &str) -> Self {
        Self {
            public_base_url: public_base_url.to_string(),
            objects: RwLock::new(BTreeMap::new()),
            failing_fragments: RwLock::new(HashSet::new()),
        }
    }

    /// Reject every later upload whose key contains `fragment`.
    pub async fn fail_on(&self, fragment: &str) {
        self.failing_fragments
            .write()
            .await
            .insert(fragment.to_string());
    }

    pub async fn get(&self, bucket: &str, key: &str) -> Option<MemoryObject> {
        self.objects
            .read()
            .await
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
    }

    /// Store an object with an explicit modification time.
    pub async fn insert_at(
        &self,
        bucket: &str,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
        last_modified: Timestamp,
    ) {
        self.objects.write().await.insert(
            (bucket.to_string(), key.to_string()),
            MemoryObject {
                bytes,
                content_type: content_type.to_string(),
                last_modified,
            },
        );
    }

    /// Number of objects across all buckets.
    pub async fn len(&self) -> usize {
        self.objects.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.objects.read().await.is_empty()
    }
}

#[async_trait]
impl ImageStore for MemoryImageStore {
    async fn upload(
        &self,
        bucket: &str,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, UploadError> {
        validate_key(key)?;
        let failing = self
            .failing_fragments
            .read()
            .await
            .iter()
            .any(|fragment| key.contains(fragment.as_str()));
        if failing {
            return Err(UploadError::Rejected {
                bucket: bucket.to_string(),
                key: key.to_string(),
                reason: "injected failure".into(),
            });
        }

        self.insert_at(bucket, key, bytes, content_type, Utc::now()).await;
        Ok(self.public_url(bucket, key))
    }

    fn public_url(&self, bucket: &str, key: &str) -> String {
        join_public_url(&self.public_base_url, bucket, key)
    }

    async fn list_objects(&self, bucket: &str) -> Result<Vec<StoredObject>, UploadError> {
        Ok(self
            .objects
            .read()
            .await
            .iter()
            .filter(|((b, _), _)| b == bucket)
            .map(|((_, key), obj)| StoredObject {
                key: key.clone(),
                last_modified: Some(obj.last_modified),
            })
            .collect())
    }

    async fn delete_objects(&self, bucket: &str, keys: &[String]) -> Result<(), UploadError> {
        let mut objects = self.objects.write().await;
        for key in keys {
            objects.remove(&(bucket.to_string(), key.clone()));
        }
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
