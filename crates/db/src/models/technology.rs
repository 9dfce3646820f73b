//! Technology entity model and DTOs.

use folio_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A technology row: an immutable name+slug pair, globally unique on both.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Technology {
    pub id: DbId,
    pub name: String,
    pub slug: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a technology. Name and slug arrive pre-normalized.
#[derive(Debug, Clone)]
pub struct CreateTechnology {
    pub name: String,
    pub slug: String,
}
