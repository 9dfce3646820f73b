//! Repository for the `technologies` table.

use folio_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::technology::{CreateTechnology, Technology};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, slug, created_at, updated_at";

/// Provides data access for technologies.
pub struct TechnologyRepo;

impl TechnologyRepo {
    /// Insert a new technology. A duplicate name or slug surfaces as a
    /// unique-constraint violation (`uq_technologies_*`).
    pub async fn create(
        pool: &PgPool,
        input: &CreateTechnology,
    ) -> Result<Technology, sqlx::Error> {
        let query = format!(
            "INSERT INTO technologies (name, slug) VALUES ($1, $2) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Technology>(&query)
            .bind(&input.name)
            .bind(&input.slug)
            .fetch_one(pool)
            .await
    }

    /// List all technologies ordered by name (case-insensitive).
    pub async fn list(pool: &PgPool) -> Result<Vec<Technology>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM technologies ORDER BY LOWER(name)");
        sqlx::query_as::<_, Technology>(&query).fetch_all(pool).await
    }

    /// Check that every id in `technology_ids` exists.
    pub async fn all_exist(
        conn: &mut PgConnection,
        technology_ids: &[DbId],
    ) -> Result<bool, sqlx::Error> {
        if technology_ids.is_empty() {
            return Ok(true);
        }
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(DISTINCT id) FROM technologies WHERE id = ANY($1)",
        )
        .bind(technology_ids)
        .fetch_one(conn)
        .await?;

        let mut distinct = technology_ids.to_vec();
        distinct.sort_unstable();
        distinct.dedup();
        Ok(count as usize == distinct.len())
    }
}
