//! Amazon S3 (or S3-compatible) image store.

use async_trait::async_trait;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{Delete, Error as DeleteFailure, ObjectIdentifier};
use aws_sdk_s3::Client;
use chrono::DateTime;
use schoolerp_core::types::Timestamp;

use crate::{join_public_url, validate_key, ImageStore, StoredObject, UploadError};

/// S3 accepts at most this many keys per `DeleteObjects` call.
const DELETE_BATCH: usize = 1000;

/// Buckets are S3 buckets; keys map one-to-one onto object keys.
pub struct S3ImageStore {
    client: Client,
    public_base_url: String,
}

impl S3ImageStore {
    pub fn new(client: Client, public_base_url: &str) -> Self {
        Self {
            client,
            public_base_url: public_base_url.to_string(),
        }
    }

    /// Build a client from the standard AWS environment (`AWS_REGION`,
    /// `AWS_ACCESS_KEY_ID`, profiles, ...). A custom `endpoint_url` switches
    /// to path-style addressing for S3-compatible services.
    pub async fn from_env(endpoint_url: Option<&str>, public_base_url: &str) -> Self {
        let sdk_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        let mut builder = aws_sdk_s3::config::Builder::from(&sdk_config);
        if let Some(url) = endpoint_url {
            builder = builder.endpoint_url(url).force_path_style(true);
        }
        Self::new(Client::from_conf(builder.build()), public_base_url)
    }
}

fn to_timestamp(dt: &aws_smithy_types::DateTime) -> Option<Timestamp> {
    DateTime::from_timestamp(dt.secs(), dt.subsec_nanos())
}

#[async_trait]
impl ImageStore for S3ImageStore {
    async fn upload(
        &self,
        bucket: &str,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, UploadError> {
        validate_key(key)?;
        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(bytes))
            .send()
            .await
            .map_err(|e| {
                if e.as_service_error().is_some() {
                    UploadError::Rejected {
                        bucket: bucket.to_string(),
                        key: key.to_string(),
                        reason: DisplayErrorContext(&e).to_string(),
                    }
                } else {
                    UploadError::Transport(DisplayErrorContext(&e).to_string())
                }
            })?;
        Ok(self.public_url(bucket, key))
    }

    fn public_url(&self, bucket: &str, key: &str) -> String {
        join_public_url(&self.public_base_url, bucket, key)
    }

    async fn list_objects(&self, bucket: &str) -> Result<Vec<StoredObject>, UploadError> {
        let mut objects = Vec::new();
        let mut continuation: Option<String> = None;

        loop {
            let page = self
                .client
                .list_objects_v2()
                .bucket(bucket)
                .set_continuation_token(continuation.take())
                .send()
                .await
                .map_err(|e| UploadError::Transport(DisplayErrorContext(&e).to_string()))?;

            for obj in page.contents() {
                if let Some(key) = obj.key() {
                    objects.push(StoredObject {
                        key: key.to_string(),
                        last_modified: obj.last_modified().and_then(to_timestamp),
                    });
                }
            }

            match page.next_continuation_token() {
                Some(token) if page.is_truncated().unwrap_or(false) => {
                    continuation = Some(token.to_string());
                }
                _ => break,
            }
        }

        Ok(objects)
    }

    async fn delete_objects(&self, bucket: &str, keys: &[String]) -> Result<(), UploadError> {
        for chunk in keys.chunks(DELETE_BATCH) {
            let identifiers = chunk
                .iter()
                .map(|key| ObjectIdentifier::builder().key(key).build())
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| UploadError::Transport(e.to_string()))?;
            let delete = Delete::builder()
                .set_objects(Some(identifiers))
                .quiet(true)
                .build()
                .map_err(|e| UploadError::Transport(e.to_string()))?;

            let output = self
                .client
                .delete_objects()
                .bucket(bucket)
                .delete(delete)
                .send()
                .await
                .map_err(|e| UploadError::Transport(DisplayErrorContext(&e).to_string()))?;
            check_delete_failures(bucket, chunk.len(), output.errors())?;
        }
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "s3"
    }
}

/// Quiet-mode `DeleteObjects` reports per-key failures inside a successful
/// response; surface the first one.
fn check_delete_failures(
    bucket: &str,
    requested: usize,
    failures: &[DeleteFailure],
) -> Result<(), UploadError> {
    let Some(first) = failures.first() else {
        return Ok(());
    };
    Err(UploadError::Rejected {
        bucket: bucket.to_string(),
        key: first.key().unwrap_or_default().to_string(),
        reason: format!(
            "{} of {requested} deletes failed: {} {}",
            failures.len(),
            first.code().unwrap_or("UnknownError"),
            first.message().unwrap_or_default()
        ),
    })
}
