//! Periodic removal of photos whose entity no longer exists.
//!
//! Photos become orphans in two ways: an enrollment whose uploads succeeded
//! but whose insert failed, and a deleted record. The request path never
//! cleans up after either; this job does. Every object key starts with its
//! entity id, so a prefix is an orphan exactly when no row has that id.
//!
//! A prefix is only swept once all of its objects are older than the grace
//! period, so the uploads of an enrollment still in flight are never
//! touched. Temp files left by a crashed local write are removed once past
//! the grace period, even under a live record.

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::Utc;
use schoolerp_core::entity::EntityKind;
use schoolerp_core::media::entity_id_from_key;
use schoolerp_core::types::{EntityId, Timestamp};
use schoolerp_db::repositories::{StudentRepo, TeacherRepo};
use schoolerp_storage::{is_partial_key, ImageStore, StoredObject, UploadError};
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;

use crate::config::OrphanSweepConfig;

#[derive(Debug, thiserror::Error)]
pub enum SweepError {
    #[error("Image store error: {0}")]
    Storage(#[from] UploadError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Outcome of one pass over every bucket.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SweepReport {
    /// Objects listed.
    pub scanned: usize,
    /// Orphaned entity prefixes removed.
    pub prefixes_removed: usize,
    /// Stale temp files removed from live prefixes.
    pub partials_removed: usize,
    /// Objects deleted.
    pub objects_deleted: usize,
}

/// Run the sweep loop until `cancel` is triggered.
pub async fn run(
    pool: PgPool,
    images: std::sync::Arc<dyn ImageStore>,
    config: OrphanSweepConfig,
    cancel: CancellationToken,
) {
    let grace = chrono::Duration::minutes(config.grace_mins);

    tracing::info!(
        interval_secs = config.interval_secs,
        grace_mins = config.grace_mins,
        backend = images.backend_name(),
        "Orphan sweep job started"
    );

    let mut interval = tokio::time::interval(Duration::from_secs(config.interval_secs));

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Orphan sweep job stopping");
                break;
            }
            _ = interval.tick() => {
                match sweep_once(&pool, images.as_ref(), grace, Utc::now()).await {
                    Ok(report) if report.objects_deleted > 0 => {
                        tracing::info!(
                            scanned = report.scanned,
                            prefixes = report.prefixes_removed,
                            partials = report.partials_removed,
                            deleted = report.objects_deleted,
                            "Orphan sweep: removed orphaned photos"
                        );
                    }
                    Ok(report) => {
                        tracing::debug!(scanned = report.scanned, "Orphan sweep: nothing to remove");
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Orphan sweep failed");
                    }
                }
            }
        }
    }
}

/// One pass over both buckets. Objects modified after `now - grace` keep
/// their whole prefix alive.
pub async fn sweep_once(
    pool: &PgPool,
    images: &dyn ImageStore,
    grace: chrono::Duration,
    now: Timestamp,
) -> Result<SweepReport, SweepError> {
    let cutoff = now - grace;
    let mut report = SweepReport::default();

    for kind in EntityKind::ALL {
        let bucket = kind.bucket();
        let objects = images.list_objects(bucket).await?;
        report.scanned += objects.len();

        let prefixes = group_by_entity(objects);
        if prefixes.is_empty() {
            continue;
        }

        let ids: Vec<EntityId> = prefixes.keys().copied().collect();
        let live = match kind {
            EntityKind::Student => StudentRepo::existing_ids(pool, &ids).await?,
            EntityKind::Teacher => TeacherRepo::existing_ids(pool, &ids).await?,
        };

        for (id, objects) in prefixes {
            if live.contains(&id) {
                let stale: Vec<String> = objects
                    .into_iter()
                    .filter(|o| {
                        is_partial_key(&o.key) && all_older_than(std::slice::from_ref(o), cutoff)
                    })
                    .map(|o| o.key)
                    .collect();
                if stale.is_empty() {
                    continue;
                }
                images.delete_objects(bucket, &stale).await?;
                tracing::debug!(%kind, %id, objects = stale.len(), "Orphan sweep: removed stale temp files");
                report.partials_removed += stale.len();
                report.objects_deleted += stale.len();
                continue;
            }
            if !all_older_than(&objects, cutoff) {
                continue;
            }
            let keys: Vec<String> = objects.into_iter().map(|o| o.key).collect();
            images.delete_objects(bucket, &keys).await?;
            tracing::debug!(%kind, %id, objects = keys.len(), "Orphan sweep: removed prefix");
            report.prefixes_removed += 1;
            report.objects_deleted += keys.len();
        }
    }

    Ok(report)
}

/// Group objects by the entity id their key starts with. Keys outside the
/// `{id}/...` layout are left alone.
fn group_by_entity(objects: Vec<StoredObject>) -> BTreeMap<EntityId, Vec<StoredObject>> {
    let mut grouped: BTreeMap<EntityId, Vec<StoredObject>> = BTreeMap::new();
    for object in objects {
        match entity_id_from_key(&object.key) {
            Some(id) => grouped.entry(id).or_default().push(object),
            None => tracing::debug!(key = %object.key, "Orphan sweep: skipping foreign key"),
        }
    }
    grouped
}

/// Objects with no modification time count as fresh.
fn all_older_than(objects: &[StoredObject], cutoff: Timestamp) -> bool {
    objects
        .iter()
        .all(|o| o.last_modified.is_some_and(|m| m < cutoff))
}
