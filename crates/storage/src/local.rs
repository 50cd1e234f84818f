//! Filesystem image store.
//!
//! Objects live at `{root}/{bucket}/{key}`. The API serves `{root}` under
//! `/media`, so public URLs are `{public_base_url}/{bucket}/{key}`.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::fs;
use uuid::Uuid;

use crate::{
    is_partial_key, join_public_url, validate_key, ImageStore, StoredObject, UploadError,
    PARTIAL_SUFFIX,
};

pub struct LocalImageStore {
    root: PathBuf,
    public_base_url: String,
}

impl LocalImageStore {
    /// Create the store, making sure `root` exists.
    pub async fn new(root: PathBuf, public_base_url: &str) -> Result<Self, UploadError> {
        fs::create_dir_all(&root).await?;
        Ok(Self {
            root,
            public_base_url: public_base_url.to_string(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn object_path(&self, bucket: &str, key: &str) -> Result<PathBuf, UploadError> {
        validate_key(bucket)?;
        validate_key(key)?;
        Ok(self.root.join(bucket).join(key))
    }
}

#[async_trait]
impl ImageStore for LocalImageStore {
    async fn upload(
        &self,
        bucket: &str,
        key: &str,
        bytes: Vec<u8>,
        _content_type: &str,
    ) -> Result<String, UploadError> {
        let path = self.object_path(bucket, key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        // Write beside the target and rename so readers never see a partial
        // file. Each write gets its own temp name; the last rename wins.
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| UploadError::InvalidKey(key.to_string()))?;
        let tmp = path.with_file_name(format!(
            ".{file_name}.{}{PARTIAL_SUFFIX}",
            Uuid::new_v4().simple()
        ));
        let written = match fs::write(&tmp, &bytes).await {
            Ok(()) => fs::rename(&tmp, &path).await,
            Err(e) => Err(e),
        };
        if let Err(e) = written {
            let _ = fs::remove_file(&tmp).await;
            return Err(e.into());
        }

        Ok(self.public_url(bucket, key))
    }

    fn public_url(&self, bucket: &str, key: &str) -> String {
        join_public_url(&self.public_base_url, bucket, key)
    }

    async fn list_objects(&self, bucket: &str) -> Result<Vec<StoredObject>, UploadError> {
        validate_key(bucket)?;
        let bucket_root = self.root.join(bucket);
        let mut objects = Vec::new();
        let mut pending = vec![bucket_root.clone()];

        while let Some(dir) = pending.pop() {
            let mut entries = match fs::read_dir(&dir).await {
                Ok(entries) => entries,
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) => return Err(e.into()),
            };
            while let Some(entry) = entries.next_entry().await? {
                let name = entry.file_name().to_string_lossy().into_owned();
                let meta = entry.metadata().await?;
                let path = entry.path();
                if meta.is_dir() {
                    if !name.starts_with('.') {
                        pending.push(path);
                    }
                    continue;
                }
                // Leftover temp files are listed; other dot-files are not ours.
                if name.starts_with('.') && !is_partial_key(&name) {
                    continue;
                }
                let Ok(relative) = path.strip_prefix(&bucket_root) else {
                    continue;
                };
                let key = relative
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy())
                    .collect::<Vec<_>>()
                    .join("/");
                objects.push(StoredObject {
                    key,
                    last_modified: meta.modified().ok().map(DateTime::<Utc>::from),
                });
            }
        }

        objects.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(objects)
    }

    async fn delete_objects(&self, bucket: &str, keys: &[String]) -> Result<(), UploadError> {
        for key in keys {
            let path = self.object_path(bucket, key)?;
            match fs::remove_file(&path).await {
                Ok(()) => {}
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
            // Drop the per-entity directory once it is empty; a non-empty
            // directory just stays.
            if let Some(parent) = path.parent() {
                if parent != self.root.join(bucket) {
                    let _ = fs::remove_dir(parent).await;
                }
            }
        }
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "local"
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    async fn store() -> (tempfile::TempDir, LocalImageStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalImageStore::new(dir.path().join("media"), "http://localhost:3000/media")
            .await
            .unwrap();
        (dir, store)
    }

    #[tokio::test]
    async fn upload_writes_file_and_overwrites() {
        let (_dir, store) = store().await;
        let url = store
            .upload("student-photos", "abc/self.png", b"one".to_vec(), "image/png")
            .await
            .unwrap();
        assert_eq!(url, "http://localhost:3000/media/student-photos/abc/self.png");

        store
            .upload("student-photos", "abc/self.png", b"two".to_vec(), "image/png")
            .await
            .unwrap();
        let on_disk = std::fs::read(store.root().join("student-photos/abc/self.png")).unwrap();
        assert_eq!(on_disk, b"two");
    }

    #[tokio::test]
    async fn list_returns_nested_keys() {
        let (_dir, store) = store().await;
        assert!(store.list_objects("student-photos").await.unwrap().is_empty());

        store.upload("student-photos", "a/self.png", vec![1], "image/png").await.unwrap();
        store.upload("student-photos", "a/mother.png", vec![1], "image/png").await.unwrap();
        store.upload("student-photos", "b/self.jpg", vec![1], "image/jpeg").await.unwrap();

        let keys: Vec<String> = store
            .list_objects("student-photos")
            .await
            .unwrap()
            .into_iter()
            .map(|o| o.key)
            .collect();
        assert_eq!(keys, ["a/mother.png", "a/self.png", "b/self.jpg"]);
    }

    #[tokio::test]
    async fn delete_removes_files_and_empty_dirs() {
        let (_dir, store) = store().await;
        store.upload("teacher-photos", "a/self.png", vec![1], "image/png").await.unwrap();

        store
            .delete_objects("teacher-photos", &["a/self.png".into(), "a/missing.png".into()])
            .await
            .unwrap();
        assert!(!store.root().join("teacher-photos/a").exists());
        assert!(store.list_objects("teacher-photos").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn concurrent_overwrites_of_one_key_all_succeed() {
        let (_dir, store) = store().await;
        let store = std::sync::Arc::new(store);

        for round in 0..20u8 {
            let writers: Vec<_> = (0..8u8)
                .map(|n| {
                    let store = std::sync::Arc::clone(&store);
                    tokio::spawn(async move {
                        store
                            .upload("student-photos", "abc/self.png", vec![round, n], "image/png")
                            .await
                    })
                })
                .collect();
            for writer in writers {
                writer.await.unwrap().unwrap();
            }
        }

        let on_disk = std::fs::read(store.root().join("student-photos/abc/self.png")).unwrap();
        assert_eq!(on_disk.len(), 2);
        assert_eq!(on_disk[0], 19);
        let keys: Vec<String> = store
            .list_objects("student-photos")
            .await
            .unwrap()
            .into_iter()
            .map(|o| o.key)
            .collect();
        assert_eq!(keys, ["abc/self.png"], "no temp files are left behind");
    }

    #[tokio::test]
    async fn leftover_partials_are_listed_and_deletable() {
        let (_dir, store) = store().await;
        store.upload("student-photos", "abc/self.png", vec![1], "image/png").await.unwrap();
        let dir = store.root().join("student-photos/abc");
        std::fs::write(dir.join(".self.png.0123abcd.partial"), b"half").unwrap();
        std::fs::write(dir.join(".DS_Store"), b"").unwrap();

        let keys: Vec<String> = store
            .list_objects("student-photos")
            .await
            .unwrap()
            .into_iter()
            .map(|o| o.key)
            .collect();
        assert_eq!(keys, ["abc/.self.png.0123abcd.partial", "abc/self.png"]);

        store
            .delete_objects("student-photos", &["abc/.self.png.0123abcd.partial".into()])
            .await
            .unwrap();
        assert!(!dir.join(".self.png.0123abcd.partial").exists());
        assert!(dir.join("self.png").exists());
    }

    #[tokio::test]
    async fn traversal_keys_are_rejected() {
        let (_dir, store) = store().await;
        let err = store
            .upload("student-photos", "../escape.png", vec![1], "image/png")
            .await
            .unwrap_err();
        assert_matches!(err, UploadError::InvalidKey(_));
    }
}
