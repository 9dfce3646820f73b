//! Asset/project saga orchestration.
//!
//! The blob store is not part of the relational transaction, so create,
//! update, and delete flows follow one ordering rule: uploads happen before
//! the transaction opens; the ledger commit happens before any old or
//! orphaned blob is deleted. A failed transaction compensates the fresh
//! uploads; a failed post-commit blob delete leaves an orphan blob, which is
//! logged and tolerated. A dangling ledger reference is never tolerated.
//!
//! Handlers run the saga section on a detached task (see
//! [`run_detached`]) so a client disconnect mid-request cannot abandon a
//! staged upload between its upload and its compensation.

use std::future::Future;

use folio_core::asset_policy::{self, AssetKind};
use folio_core::types::DbId;
use folio_db::models::asset::{Asset, CreateAsset};
use folio_db::repositories::AssetRepo;
use folio_storage::{AssetStore, StoredObject};
use sqlx::{PgConnection, PgPool};

use crate::error::{AppError, AppResult};

/// A blob uploaded ahead of the transaction, not yet recorded in the ledger.
///
/// Until [`persist`] commits, the holder is responsible for eventually
/// passing this to [`compensate`] on failure.
#[derive(Debug, Clone)]
pub struct StagedUpload {
    pub kind: AssetKind,
    pub stored: StoredObject,
}

/// Outcome of a compensation attempt. Failures are logged by
/// [`compensate`]; the tag exists so callers and tests can observe which
/// path ran without the failure ever surfacing to the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompensationOutcome {
    Compensated,
    CompensationFailed,
}

/// Validate and upload a blob before the transaction opens.
///
/// Enforces the kind-specific size limits. On upload failure nothing has
/// been persisted anywhere, so the error propagates with no cleanup owed.
pub async fn stage_upload(
    store: &dyn AssetStore,
    owner_id: DbId,
    kind: AssetKind,
    file_name: &str,
    data: Vec<u8>,
) -> AppResult<StagedUpload> {
    asset_policy::validate_upload(kind, data.len()).map_err(AppError::Core)?;

    let folder = asset_policy::owner_folder(owner_id);
    let stored = store.upload(data, file_name, &folder, kind).await?;

    tracing::debug!(
        owner_id,
        kind = kind.as_str(),
        storage_key = %stored.storage_key,
        "Staged upload"
    );
    Ok(StagedUpload { kind, stored })
}

/// Record a staged upload in the asset ledger inside the caller's
/// transaction.
pub async fn persist(
    conn: &mut PgConnection,
    provider: &str,
    owner_id: DbId,
    staged: &StagedUpload,
) -> Result<Asset, sqlx::Error> {
    AssetRepo::create(
        conn,
        &CreateAsset {
            owner_id,
            provider: provider.to_string(),
            storage_key: staged.stored.storage_key.clone(),
            url: staged.stored.url.clone(),
            resource_type: staged.kind.as_str().to_string(),
        },
    )
    .await
}

/// Best-effort blob delete after a failed transaction.
///
/// The delete failure is logged and swallowed: the caller re-surfaces the
/// original transaction error, and the worst case is an orphan blob.
pub async fn compensate(store: &dyn AssetStore, staged: &StagedUpload) -> CompensationOutcome {
    match store.delete(&staged.stored.storage_key, staged.kind).await {
        Ok(()) => {
            tracing::info!(storage_key = %staged.stored.storage_key, "Compensated staged upload");
            CompensationOutcome::Compensated
        }
        Err(e) => {
            tracing::error!(
                storage_key = %staged.stored.storage_key,
                error = %e,
                "Compensation failed; blob orphaned"
            );
            CompensationOutcome::CompensationFailed
        }
    }
}

/// Compensate every staged upload of a failed saga, in order.
pub async fn compensate_all(store: &dyn AssetStore, staged: &[StagedUpload]) {
    for upload in staged {
        compensate(store, upload).await;
    }
}

/// Remove an asset from the ledger, then from the blob store.
///
/// The ledger delete runs (and is visible) first; the blob delete afterwards
/// is best-effort and failures are swallowed. An unknown asset id is a no-op
/// rather than an error, so retried cleanup is safe.
pub async fn delete_everywhere(
    pool: &PgPool,
    store: &dyn AssetStore,
    owner_id: DbId,
    asset_id: DbId,
) -> Result<(), sqlx::Error> {
    let Some(asset) = AssetRepo::find_by_id(pool, owner_id, asset_id).await? else {
        return Ok(());
    };

    let mut conn = pool.acquire().await?;
    AssetRepo::delete(&mut conn, owner_id, asset_id).await?;
    drop(conn);

    discard_blob(store, &asset).await;
    Ok(())
}

/// Best-effort blob delete for an asset whose ledger row is already gone.
pub async fn discard_blob(store: &dyn AssetStore, asset: &Asset) {
    let kind = match AssetKind::parse(&asset.resource_type) {
        Ok(kind) => kind,
        Err(e) => {
            tracing::error!(asset_id = asset.id, error = %e, "Unknown asset kind; blob kept");
            return;
        }
    };
    if let Err(e) = store.delete(&asset.storage_key, kind).await {
        tracing::warn!(
            storage_key = %asset.storage_key,
            error = %e,
            "Post-commit blob delete failed; blob orphaned"
        );
    }
}

/// Run a saga section to completion regardless of client disconnects.
///
/// Axum drops a handler future when the client goes away; a drop between a
/// staged upload and its compensation would leak the blob. Spawning the
/// section as its own task means it always runs to completion; the handler
/// merely awaits the result.
pub async fn run_detached<F, T>(section: F) -> AppResult<T>
where
    F: Future<Output = AppResult<T>> + Send + 'static,
    T: Send + 'static,
{
    tokio::spawn(section)
        .await
        .map_err(|e| AppError::InternalError(format!("Saga task failed: {e}")))?
}
