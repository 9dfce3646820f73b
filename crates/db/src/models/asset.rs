//! Asset entity model and DTOs.
//!
//! Asset rows are immutable once created: replacement means creating a new
//! asset and retargeting the referencing project, never editing the URL or
//! storage key in place. There is deliberately no update DTO.

use folio_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// An asset row from the `assets` table: the system-of-record pointer to a
/// blob held by the external store.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Asset {
    pub id: DbId,
    pub owner_id: DbId,
    /// Storage provider label (currently always `"s3"`).
    pub provider: String,
    /// Opaque identifier the blob store deletes by.
    pub storage_key: String,
    pub url: String,
    /// `"image"` or `"video"` (see `folio_core::asset_policy::AssetKind`).
    pub resource_type: String,
    pub created_at: Timestamp,
}

/// DTO for recording a completed upload.
#[derive(Debug, Clone)]
pub struct CreateAsset {
    pub owner_id: DbId,
    pub provider: String,
    pub storage_key: String,
    pub url: String,
    pub resource_type: String,
}
