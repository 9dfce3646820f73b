//! Asset kind policy: size limits and blob-store naming.
//!
//! Image vs video is a closed variant, not a trait hierarchy; every
//! kind-specific rule (byte limits, resource-type labels) dispatches on it.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::DbId;

/// Maximum accepted cover image size (10 MiB).
pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

/// Maximum accepted demo video size (50 MiB).
pub const MAX_VIDEO_BYTES: usize = 50 * 1024 * 1024;

/// The kind of blob an asset points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    Image,
    Video,
}

impl AssetKind {
    /// Maximum accepted upload size in bytes for this kind.
    pub fn max_bytes(self) -> usize {
        match self {
            AssetKind::Image => MAX_IMAGE_BYTES,
            AssetKind::Video => MAX_VIDEO_BYTES,
        }
    }

    /// Stable label stored in the `assets.resource_type` column and used by
    /// the blob store to pick the matching resource class.
    pub fn as_str(self) -> &'static str {
        match self {
            AssetKind::Image => "image",
            AssetKind::Video => "video",
        }
    }

    /// Parse the stored label back into a kind.
    pub fn parse(value: &str) -> Result<Self, CoreError> {
        match value {
            "image" => Ok(AssetKind::Image),
            "video" => Ok(AssetKind::Video),
            other => Err(CoreError::Validation(format!(
                "Unknown asset kind '{other}'. Must be one of: image, video"
            ))),
        }
    }
}

impl std::fmt::Display for AssetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validate an upload payload against the kind's size limit.
///
/// Empty payloads are rejected outright.
pub fn validate_upload(kind: AssetKind, size_bytes: usize) -> Result<(), CoreError> {
    if size_bytes == 0 {
        return Err(CoreError::Validation("File is empty".into()));
    }
    if size_bytes > kind.max_bytes() {
        return Err(CoreError::Validation(format!(
            "{kind} exceeds the {} MiB limit",
            kind.max_bytes() / (1024 * 1024)
        )));
    }
    Ok(())
}

/// Blob-store folder for an owner's assets.
pub fn owner_folder(owner_id: DbId) -> String {
    format!("portfolio/{owner_id}")
}
