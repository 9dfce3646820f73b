//! Project entity model and DTOs.

use folio_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Publication status of a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "project_status", rename_all = "lowercase")]
pub enum ProjectStatus {
    Draft,
    Published,
}

impl Default for ProjectStatus {
    fn default() -> Self {
        ProjectStatus::Draft
    }
}

impl ProjectStatus {
    /// Parse a form-supplied status string; anything unrecognized is Draft,
    /// matching the lenient form handling of the original API surface.
    pub fn parse_lenient(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "published" => ProjectStatus::Published,
            _ => ProjectStatus::Draft,
        }
    }
}

/// A project row from the `projects` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: DbId,
    pub owner_id: DbId,
    pub name: String,
    pub short_description: String,
    pub long_description: Option<String>,
    pub live_url: Option<String>,
    pub repo_url: Option<String>,
    pub status: ProjectStatus,
    pub is_pinned: bool,
    pub display_order: i32,
    pub cover_asset_id: DbId,
    pub demo_video_asset_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting a project row. The ordering fields are the resolved
/// placement computed by the ordering engine, never caller input.
#[derive(Debug, Clone)]
pub struct CreateProject {
    pub owner_id: DbId,
    pub name: String,
    pub short_description: String,
    pub long_description: Option<String>,
    pub live_url: Option<String>,
    pub repo_url: Option<String>,
    pub status: ProjectStatus,
    pub is_pinned: bool,
    pub display_order: i32,
    pub cover_asset_id: DbId,
    pub demo_video_asset_id: Option<DbId>,
}

/// DTO for updating a project's content fields. Ordering/pinning changes go
/// through the engine plan and `ProjectRepo::write_order`, not this struct.
#[derive(Debug, Clone)]
pub struct UpdateProjectContent {
    pub name: String,
    pub short_description: String,
    pub long_description: Option<String>,
    pub live_url: Option<String>,
    pub repo_url: Option<String>,
    pub status: ProjectStatus,
    pub cover_asset_id: DbId,
    pub demo_video_asset_id: Option<DbId>,
}
