//! Repository for the `projects` table and its technology join.
//!
//! Mutating methods take `&mut PgConnection` so they compose into the
//! caller's transaction: one transaction covers the project row, asset
//! rows, and technology joins of a create/update. Read-only listing methods
//! take the pool. Placement decisions (shift targets, final orders) are
//! computed by `folio_core::ordering`; this repository only reads snapshots
//! and applies plans.

use folio_core::ordering::{self, OwnerSnapshot, ProjectSlot};
use folio_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::project::{CreateProject, Project, UpdateProjectContent};
use crate::models::technology::Technology;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, owner_id, name, short_description, long_description, live_url, \
     repo_url, status, is_pinned, display_order, cover_asset_id, demo_video_asset_id, \
     created_at, updated_at";

/// A technology row tagged with the project it belongs to, for bulk fetches.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TechnologyForProject {
    pub project_id: DbId,
    #[sqlx(flatten)]
    pub technology: Technology,
}

/// Provides data access for projects. No invariant logic lives here.
pub struct ProjectRepo;

impl ProjectRepo {
    // -----------------------------------------------------------------------
    // Ordering primitives (consumed by the engine's callers)
    // -----------------------------------------------------------------------

    /// Read the owner's ordering state under row locks.
    ///
    /// `FOR UPDATE` serializes concurrent ordering mutations for the same
    /// owner: the second writer blocks here until the first commits, then
    /// sees the committed orders. The unique constraints remain the
    /// commit-time backstop.
    pub async fn ordering_snapshot(
        conn: &mut PgConnection,
        owner_id: DbId,
    ) -> Result<OwnerSnapshot, sqlx::Error> {
        let rows: Vec<(DbId, bool, i32, chrono::DateTime<chrono::Utc>)> = sqlx::query_as(
            "SELECT id, is_pinned, display_order, created_at FROM projects \
             WHERE owner_id = $1 \
             ORDER BY display_order \
             FOR UPDATE",
        )
        .bind(owner_id)
        .fetch_all(conn)
        .await?;

        let mut snapshot = OwnerSnapshot::default();
        for (id, is_pinned, display_order, created_at) in rows {
            if is_pinned {
                snapshot.pinned = Some(id);
            } else {
                snapshot.non_pinned.push(ProjectSlot {
                    id,
                    display_order,
                    created_at,
                });
            }
        }
        Ok(snapshot)
    }

    /// The id of the owner's pinned project, if any.
    pub async fn pinned_project_id(
        pool: &PgPool,
        owner_id: DbId,
    ) -> Result<Option<DbId>, sqlx::Error> {
        sqlx::query_scalar("SELECT id FROM projects WHERE owner_id = $1 AND is_pinned")
            .bind(owner_id)
            .fetch_optional(pool)
            .await
    }

    /// Highest non-pinned display order for an owner (0 when none exist).
    pub async fn max_display_order(pool: &PgPool, owner_id: DbId) -> Result<i32, sqlx::Error> {
        let max: Option<i32> = sqlx::query_scalar(
            "SELECT MAX(display_order) FROM projects WHERE owner_id = $1 AND NOT is_pinned",
        )
        .bind(owner_id)
        .fetch_one(pool)
        .await?;
        Ok(max.unwrap_or(0))
    }

    /// Shift non-pinned display orders at/above `from_order_inclusive` by
    /// `delta`, optionally excluding one row (the one being demoted or
    /// moved, which receives its final order via [`Self::write_order`]).
    pub async fn shift_display_orders(
        conn: &mut PgConnection,
        owner_id: DbId,
        from_order_inclusive: i32,
        delta: i32,
        exclude_id: Option<DbId>,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE projects \
             SET display_order = display_order + $3, updated_at = NOW() \
             WHERE owner_id = $1 AND NOT is_pinned AND display_order >= $2 \
               AND ($4::BIGINT IS NULL OR id <> $4)",
        )
        .bind(owner_id)
        .bind(from_order_inclusive)
        .bind(delta)
        .bind(exclude_id)
        .execute(conn)
        .await?;
        Ok(result.rows_affected())
    }

    /// Write a single project's resolved `(is_pinned, display_order)` pair.
    pub async fn write_order(
        conn: &mut PgConnection,
        project_id: DbId,
        new_order: i32,
        new_pinned: bool,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE projects SET display_order = $2, is_pinned = $3, updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(project_id)
        .bind(new_order)
        .bind(new_pinned)
        .execute(conn)
        .await?;
        Ok(())
    }

    /// Restore the dense `1..N` sequence for an owner's non-pinned projects.
    ///
    /// The safety net at the end of every mutating operation: reads the
    /// current non-pinned rows, asks the engine for the renumbering plan,
    /// and applies only the rows whose order actually changes.
    pub async fn normalize_display_orders(
        conn: &mut PgConnection,
        owner_id: DbId,
    ) -> Result<u64, sqlx::Error> {
        let rows: Vec<(DbId, i32, chrono::DateTime<chrono::Utc>)> = sqlx::query_as(
            "SELECT id, display_order, created_at FROM projects \
             WHERE owner_id = $1 AND NOT is_pinned \
             ORDER BY display_order \
             FOR UPDATE",
        )
        .bind(owner_id)
        .fetch_all(&mut *conn)
        .await?;

        let snapshot = OwnerSnapshot {
            pinned: None,
            non_pinned: rows
                .into_iter()
                .map(|(id, display_order, created_at)| ProjectSlot {
                    id,
                    display_order,
                    created_at,
                })
                .collect(),
        };

        let plan = ordering::plan_normalize(&snapshot);
        let mut applied = 0;
        for change in &plan.changes {
            sqlx::query(
                "UPDATE projects SET display_order = $2, updated_at = NOW() WHERE id = $1",
            )
            .bind(change.project_id)
            .bind(change.new_order)
            .execute(&mut *conn)
            .await?;
            applied += 1;
        }
        if applied > 0 {
            tracing::debug!(owner_id, rows = applied, "Renumbered display orders");
        }
        Ok(applied)
    }

    // -----------------------------------------------------------------------
    // CRUD
    // -----------------------------------------------------------------------

    /// Insert a new project row, returning the created row.
    pub async fn create(
        conn: &mut PgConnection,
        input: &CreateProject,
    ) -> Result<Project, sqlx::Error> {
        let query = format!(
            "INSERT INTO projects \
                (owner_id, name, short_description, long_description, live_url, repo_url, \
                 status, is_pinned, display_order, cover_asset_id, demo_video_asset_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(input.owner_id)
            .bind(&input.name)
            .bind(&input.short_description)
            .bind(&input.long_description)
            .bind(&input.live_url)
            .bind(&input.repo_url)
            .bind(input.status)
            .bind(input.is_pinned)
            .bind(input.display_order)
            .bind(input.cover_asset_id)
            .bind(input.demo_video_asset_id)
            .fetch_one(conn)
            .await
    }

    /// Find a project by id, scoped to its owner.
    pub async fn find_by_id(
        pool: &PgPool,
        owner_id: DbId,
        project_id: DbId,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE owner_id = $1 AND id = $2");
        sqlx::query_as::<_, Project>(&query)
            .bind(owner_id)
            .bind(project_id)
            .fetch_optional(pool)
            .await
    }

    /// Find a project by id inside an open transaction.
    pub async fn find_by_id_in_tx(
        conn: &mut PgConnection,
        owner_id: DbId,
        project_id: DbId,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE owner_id = $1 AND id = $2");
        sqlx::query_as::<_, Project>(&query)
            .bind(owner_id)
            .bind(project_id)
            .fetch_optional(conn)
            .await
    }

    /// List all of an owner's projects, pinned first, then by display order.
    pub async fn list_all(pool: &PgPool, owner_id: DbId) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM projects WHERE owner_id = $1 \
             ORDER BY is_pinned DESC, display_order"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(owner_id)
            .fetch_all(pool)
            .await
    }

    /// List an owner's published projects, pinned first, then by display order.
    pub async fn list_published(
        pool: &PgPool,
        owner_id: DbId,
    ) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM projects \
             WHERE owner_id = $1 AND status = 'published' \
             ORDER BY is_pinned DESC, display_order"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(owner_id)
            .fetch_all(pool)
            .await
    }

    /// Update a project's content fields (full replacement, per the update
    /// contract). Returns the updated row, or `None` if the project does
    /// not exist for this owner.
    pub async fn update_content(
        conn: &mut PgConnection,
        owner_id: DbId,
        project_id: DbId,
        input: &UpdateProjectContent,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET \
                name = $3, short_description = $4, long_description = $5, \
                live_url = $6, repo_url = $7, status = $8, \
                cover_asset_id = $9, demo_video_asset_id = $10, \
                updated_at = NOW() \
             WHERE owner_id = $1 AND id = $2 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(owner_id)
            .bind(project_id)
            .bind(&input.name)
            .bind(&input.short_description)
            .bind(&input.long_description)
            .bind(&input.live_url)
            .bind(&input.repo_url)
            .bind(input.status)
            .bind(input.cover_asset_id)
            .bind(input.demo_video_asset_id)
            .fetch_optional(conn)
            .await
    }

    /// Delete a project row. Returns `true` if a row was removed.
    pub async fn delete(
        conn: &mut PgConnection,
        owner_id: DbId,
        project_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM projects WHERE owner_id = $1 AND id = $2")
            .bind(owner_id)
            .bind(project_id)
            .execute(conn)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // -----------------------------------------------------------------------
    // Technology join
    // -----------------------------------------------------------------------

    /// Replace the full technology set for a project.
    pub async fn replace_technologies(
        conn: &mut PgConnection,
        project_id: DbId,
        technology_ids: &[DbId],
    ) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM project_technologies WHERE project_id = $1")
            .bind(project_id)
            .execute(&mut *conn)
            .await?;

        if !technology_ids.is_empty() {
            // UNNEST handles de-duplication via ON CONFLICT on the PK.
            sqlx::query(
                "INSERT INTO project_technologies (project_id, technology_id) \
                 SELECT $1, t FROM UNNEST($2::BIGINT[]) AS t \
                 ON CONFLICT DO NOTHING",
            )
            .bind(project_id)
            .bind(technology_ids)
            .execute(conn)
            .await?;
        }
        Ok(())
    }

    /// Remove all technology joins for a project (used before deletion).
    pub async fn remove_technologies(
        conn: &mut PgConnection,
        project_id: DbId,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM project_technologies WHERE project_id = $1")
            .bind(project_id)
            .execute(conn)
            .await?;
        Ok(())
    }

    /// Bulk-fetch technologies for a set of the owner's projects, ordered by
    /// technology name within each project.
    pub async fn technologies_for_projects(
        pool: &PgPool,
        owner_id: DbId,
        project_ids: &[DbId],
    ) -> Result<Vec<TechnologyForProject>, sqlx::Error> {
        if project_ids.is_empty() {
            return Ok(Vec::new());
        }
        sqlx::query_as::<_, TechnologyForProject>(
            "SELECT pt.project_id, t.id, t.name, t.slug, t.created_at, t.updated_at \
             FROM project_technologies pt \
             JOIN technologies t ON t.id = pt.technology_id \
             JOIN projects p ON p.id = pt.project_id \
             WHERE p.owner_id = $1 AND pt.project_id = ANY($2) \
             ORDER BY pt.project_id, t.name",
        )
        .bind(owner_id)
        .bind(project_ids)
        .fetch_all(pool)
        .await
    }
}
