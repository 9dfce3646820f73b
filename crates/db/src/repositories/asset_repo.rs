//! Repository for the `assets` table.
//!
//! Asset rows are the system of record for "does this asset still exist";
//! the blob store is reconciled to match them, never the reverse. Rows are
//! immutable: there is no update method by design.

use folio_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::asset::{Asset, CreateAsset};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, owner_id, provider, storage_key, url, resource_type, created_at";

/// Provides data access for asset ledger rows.
pub struct AssetRepo;

impl AssetRepo {
    /// Record a completed upload inside the caller's transaction.
    pub async fn create(
        conn: &mut PgConnection,
        input: &CreateAsset,
    ) -> Result<Asset, sqlx::Error> {
        let query = format!(
            "INSERT INTO assets (owner_id, provider, storage_key, url, resource_type) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Asset>(&query)
            .bind(input.owner_id)
            .bind(&input.provider)
            .bind(&input.storage_key)
            .bind(&input.url)
            .bind(&input.resource_type)
            .fetch_one(conn)
            .await
    }

    /// Find an asset by id, scoped to its owner.
    pub async fn find_by_id(
        pool: &PgPool,
        owner_id: DbId,
        asset_id: DbId,
    ) -> Result<Option<Asset>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM assets WHERE owner_id = $1 AND id = $2");
        sqlx::query_as::<_, Asset>(&query)
            .bind(owner_id)
            .bind(asset_id)
            .fetch_optional(pool)
            .await
    }

    /// Bulk-fetch assets by id for one owner (missing ids are skipped).
    pub async fn find_by_ids(
        pool: &PgPool,
        owner_id: DbId,
        asset_ids: &[DbId],
    ) -> Result<Vec<Asset>, sqlx::Error> {
        if asset_ids.is_empty() {
            return Ok(Vec::new());
        }
        let query = format!("SELECT {COLUMNS} FROM assets WHERE owner_id = $1 AND id = ANY($2)");
        sqlx::query_as::<_, Asset>(&query)
            .bind(owner_id)
            .bind(asset_ids)
            .fetch_all(pool)
            .await
    }

    /// Delete an asset row. Returns `true` if a row was removed; `false`
    /// means the id was already gone (callers treat that as a no-op so
    /// retried cleanup is safe).
    pub async fn delete(
        conn: &mut PgConnection,
        owner_id: DbId,
        asset_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM assets WHERE owner_id = $1 AND id = $2")
            .bind(owner_id)
            .bind(asset_id)
            .execute(conn)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
