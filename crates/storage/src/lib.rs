//! Object storage for entity photos.
//!
//! [`ImageStore`] is the seam between the API and wherever photo bytes
//! actually live. Three backends implement it:
//!
//! - [`S3ImageStore`] -- Amazon S3 or any S3-compatible service.
//! - [`LocalImageStore`] -- a directory on disk, served by the API under `/media`.
//! - [`MemoryImageStore`] -- process memory, for tests and throwaway dev runs.
//!
//! One store is built at startup with [`connect`] and shared behind an
//! `Arc<dyn ImageStore>`.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use schoolerp_core::types::Timestamp;

pub mod local;
pub mod memory;
pub mod s3;

pub use local::LocalImageStore;
pub use memory::MemoryImageStore;
pub use s3::S3ImageStore;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Failure writing to, listing, or deleting from the store.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    /// The store refused the operation (quota, permission, bad bucket).
    #[error("Store rejected {bucket}/{key}: {reason}")]
    Rejected {
        bucket: String,
        key: String,
        reason: String,
    },

    /// The store could not be reached or the SDK failed.
    #[error("Store transport error: {0}")]
    Transport(String),

    /// Local filesystem failure.
    #[error("Store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The object key is empty or escapes its bucket.
    #[error("Invalid object key '{0}'")]
    InvalidKey(String),
}

/// Suffix of an unfinished local write. These are listed so the orphan sweep
/// can reclaim ones left behind by a crashed process.
pub const PARTIAL_SUFFIX: &str = ".partial";

/// Whether `key` names an unfinished write rather than a stored photo.
pub fn is_partial_key(key: &str) -> bool {
    let name = key.rsplit('/').next().unwrap_or(key);
    name.starts_with('.') && name.ends_with(PARTIAL_SUFFIX)
}

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// An object present in a bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub key: String,
    pub last_modified: Option<Timestamp>,
}

#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Write `bytes` at `bucket/key`, replacing any existing object, and
    /// return the object's public URL.
    async fn upload(
        &self,
        bucket: &str,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, UploadError>;

    /// Public URL of `bucket/key`, whether or not the object exists.
    fn public_url(&self, bucket: &str, key: &str) -> String;

    /// Every object in `bucket`.
    async fn list_objects(&self, bucket: &str) -> Result<Vec<StoredObject>, UploadError>;

    /// Delete `keys` from `bucket`. Missing keys are not an error.
    async fn delete_objects(&self, bucket: &str, keys: &[String]) -> Result<(), UploadError>;

    /// Short backend name for logs and health output.
    fn backend_name(&self) -> &'static str;
}

// ---------------------------------------------------------------------------
// Construction
// ---------------------------------------------------------------------------

/// Backend selection, resolved from configuration at startup.
#[derive(Debug, Clone)]
pub enum StorageSettings {
    Local {
        root: PathBuf,
        public_base_url: String,
    },
    S3 {
        /// Custom endpoint for S3-compatible services; uses path-style
        /// addressing when set.
        endpoint_url: Option<String>,
        public_base_url: String,
    },
    Memory {
        public_base_url: String,
    },
}

/// Build the configured store.
pub async fn connect(settings: &StorageSettings) -> Result<Arc<dyn ImageStore>, UploadError> {
    let store: Arc<dyn ImageStore> = match settings {
        StorageSettings::Local {
            root,
            public_base_url,
        } => Arc::new(LocalImageStore::new(root.clone(), public_base_url).await?),
        StorageSettings::S3 {
            endpoint_url,
            public_base_url,
        } => Arc::new(S3ImageStore::from_env(endpoint_url.as_deref(), public_base_url).await),
        StorageSettings::Memory { public_base_url } => {
            Arc::new(MemoryImageStore::new(public_base_url))
        }
    };
    tracing::info!(backend = store.backend_name(), "Image store ready");
    Ok(store)
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Reject keys that are empty, absolute, or that climb out of the bucket.
pub fn validate_key(key: &str) -> Result<(), UploadError> {
    let bad = key.is_empty()
        || key.starts_with('/')
        || key.contains('\\')
        || key.split('/').any(|seg| seg.is_empty() || seg == "." || seg == "..");
    if bad {
        return Err(UploadError::InvalidKey(key.to_string()));
    }
    Ok(())
}

/// `{base}/{bucket}/{key}` with exactly one slash at each join.
pub(crate) fn join_public_url(base: &str, bucket: &str, key: &str) -> String {
    format!("{}/{bucket}/{key}", base.trim_end_matches('/'))
}
