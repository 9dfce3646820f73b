//! Handlers for the `/projects` resource.
//!
//! Create and update accept multipart forms carrying the content fields plus
//! the cover image and optional demo video. Each mutation follows the saga
//! ordering rule (upload, then transaction, then old-blob cleanup) and ends
//! with a display-order normalization pass inside the same transaction.

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;
use folio_core::asset_policy::AssetKind;
use folio_core::error::CoreError;
use folio_core::ordering::{self, InsertPlan, UpdatePlan};
use folio_core::types::{DbId, Timestamp};
use folio_core::validation;
use folio_db::models::project::{
    CreateProject, Project, ProjectStatus, UpdateProjectContent,
};
use folio_db::models::technology::Technology;
use folio_db::repositories::{AssetRepo, ProjectRepo, TechnologyRepo};
use serde::Serialize;
use sqlx::{PgConnection, PgPool};
use std::collections::HashMap;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::saga::{self, StagedUpload};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// A project with its asset URLs and technologies resolved.
#[derive(Debug, Serialize)]
pub struct ProjectDto {
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
    pub cover_url: String,
    pub demo_video_url: Option<String>,
    pub technologies: Vec<Technology>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Resolve asset URLs and technologies for a list of projects.
pub async fn build_dtos(
    pool: &PgPool,
    owner_id: DbId,
    projects: Vec<Project>,
) -> AppResult<Vec<ProjectDto>> {
    let mut asset_ids: Vec<DbId> = Vec::new();
    for p in &projects {
        asset_ids.push(p.cover_asset_id);
        if let Some(demo_id) = p.demo_video_asset_id {
            asset_ids.push(demo_id);
        }
    }

    let assets = AssetRepo::find_by_ids(pool, owner_id, &asset_ids).await?;
    let urls: HashMap<DbId, String> = assets.into_iter().map(|a| (a.id, a.url)).collect();

    let project_ids: Vec<DbId> = projects.iter().map(|p| p.id).collect();
    let mut technologies: HashMap<DbId, Vec<Technology>> = HashMap::new();
    for row in ProjectRepo::technologies_for_projects(pool, owner_id, &project_ids).await? {
        technologies
            .entry(row.project_id)
            .or_default()
            .push(row.technology);
    }

    projects
        .into_iter()
        .map(|p| {
            let cover_url = urls.get(&p.cover_asset_id).cloned().ok_or_else(|| {
                AppError::InternalError(format!("Missing asset row for project {}", p.id))
            })?;
            let demo_video_url = match p.demo_video_asset_id {
                Some(id) => Some(urls.get(&id).cloned().ok_or_else(|| {
                    AppError::InternalError(format!("Missing asset row for project {}", p.id))
                })?),
                None => None,
            };
            let techs = technologies.remove(&p.id).unwrap_or_default();
            Ok(ProjectDto {
                id: p.id,
                owner_id: p.owner_id,
                name: p.name,
                short_description: p.short_description,
                long_description: p.long_description,
                live_url: p.live_url,
                repo_url: p.repo_url,
                status: p.status,
                is_pinned: p.is_pinned,
                display_order: p.display_order,
                cover_url,
                demo_video_url,
                technologies: techs,
                created_at: p.created_at,
                updated_at: p.updated_at,
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Multipart form
// ---------------------------------------------------------------------------

/// Decoded multipart form for project create/update.
#[derive(Debug, Default)]
struct ProjectForm {
    name: Option<String>,
    short_description: Option<String>,
    long_description: Option<String>,
    live_url: Option<String>,
    repo_url: Option<String>,
    status: Option<String>,
    is_pinned: bool,
    display_order: Option<i32>,
    technology_ids: Vec<DbId>,
    cover: Option<(String, Vec<u8>)>,
    demo_video: Option<(String, Vec<u8>)>,
    remove_demo_video: bool,
}

/// Content fields validated out of a [`ProjectForm`].
struct ProjectContent {
    name: String,
    short_description: String,
    long_description: Option<String>,
    live_url: Option<String>,
    repo_url: Option<String>,
    status: ProjectStatus,
}

async fn parse_project_form(multipart: &mut Multipart) -> AppResult<ProjectForm> {
    let mut form = ProjectForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "cover" => {
                let filename = field.file_name().unwrap_or("cover.jpg").to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                form.cover = Some((filename, data.to_vec()));
            }
            "demo_video" | "demoVideo" => {
                let filename = field.file_name().unwrap_or("demo.mp4").to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                form.demo_video = Some((filename, data.to_vec()));
            }
            "technology_ids" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                for part in text.split(',').map(str::trim).filter(|s| !s.is_empty()) {
                    let id: DbId = part.parse().map_err(|_| {
                        AppError::BadRequest(format!("Invalid technology id '{part}'"))
                    })?;
                    form.technology_ids.push(id);
                }
            }
            other => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                match other {
                    "name" => form.name = Some(text),
                    "short_description" => form.short_description = Some(text),
                    "long_description" => form.long_description = non_empty(text),
                    "live_url" => form.live_url = non_empty(text),
                    "repo_url" => form.repo_url = non_empty(text),
                    "status" => form.status = Some(text),
                    "is_pinned" => form.is_pinned = parse_bool(&text),
                    "display_order" => {
                        form.display_order = Some(text.trim().parse().map_err(|_| {
                            AppError::BadRequest(format!("Invalid display_order '{text}'"))
                        })?);
                    }
                    "remove_demo_video" => form.remove_demo_video = parse_bool(&text),
                    _ => {} // ignore unknown fields
                }
            }
        }
    }

    Ok(form)
}

fn non_empty(text: String) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn parse_bool(text: &str) -> bool {
    matches!(text.trim().to_lowercase().as_str(), "true" | "1" | "on")
}

/// Validate the form's content fields into a [`ProjectContent`].
fn validate_content(form: &ProjectForm) -> AppResult<ProjectContent> {
    let name = form.name.as_deref().unwrap_or("").trim().to_string();
    validation::require_non_blank(&name, "name").map_err(AppError::Core)?;

    let short_description = form
        .short_description
        .as_deref()
        .unwrap_or("")
        .trim()
        .to_string();
    validation::require_non_blank(&short_description, "short_description")
        .map_err(AppError::Core)?;

    validation::validate_optional_url(form.live_url.as_deref(), "live_url")
        .map_err(AppError::Core)?;
    validation::validate_optional_url(form.repo_url.as_deref(), "repo_url")
        .map_err(AppError::Core)?;

    let status = form
        .status
        .as_deref()
        .map(ProjectStatus::parse_lenient)
        .unwrap_or_default();

    Ok(ProjectContent {
        name,
        short_description,
        long_description: form.long_description.clone(),
        live_url: form.live_url.clone(),
        repo_url: form.repo_url.clone(),
        status,
    })
}

// ---------------------------------------------------------------------------
// Read handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/projects
///
/// The owner's published projects, pinned first, then by display order.
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<Vec<ProjectDto>>>> {
    let projects = ProjectRepo::list_published(&state.pool, user.user_id).await?;
    let dtos = build_dtos(&state.pool, user.user_id, projects).await?;
    Ok(Json(DataResponse { data: dtos }))
}

/// GET /api/v1/projects/admin
///
/// All of the owner's projects, drafts included.
pub async fn list_admin(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<Vec<ProjectDto>>>> {
    let projects = ProjectRepo::list_all(&state.pool, user.user_id).await?;
    let dtos = build_dtos(&state.pool, user.user_id, projects).await?;
    Ok(Json(DataResponse { data: dtos }))
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

/// POST /api/v1/projects
///
/// Multipart create: `cover` file required, `demo_video` optional. Uploads
/// are staged before the transaction opens; a failed transaction
/// compensates them and surfaces the original error.
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<DataResponse<ProjectDto>>)> {
    let form = parse_project_form(&mut multipart).await?;

    // The saga section runs detached so a client disconnect cannot abandon
    // a staged upload before compensation.
    let owner_id = user.user_id;
    let section_state = state.clone();
    let project =
        saga::run_detached(async move { create_section(section_state, owner_id, form).await })
            .await?;

    let dtos = build_dtos(&state.pool, owner_id, vec![project]).await?;
    let dto = dtos
        .into_iter()
        .next()
        .ok_or_else(|| AppError::InternalError("Created project vanished".into()))?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: dto })))
}

async fn create_section(state: AppState, owner_id: DbId, form: ProjectForm) -> AppResult<Project> {
    let content = validate_content(&form)?;

    let (cover_name, cover_data) = form
        .cover
        .ok_or_else(|| AppError::BadRequest("Missing required 'cover' file".into()))?;

    // Stage uploads before the transaction opens.
    let store = state.asset_store.as_ref();
    let mut staged: Vec<StagedUpload> = Vec::new();

    let cover_staged =
        saga::stage_upload(store, owner_id, AssetKind::Image, &cover_name, cover_data).await?;
    staged.push(cover_staged.clone());

    let demo_staged = match form.demo_video {
        Some((file_name, data)) => {
            match saga::stage_upload(store, owner_id, AssetKind::Video, &file_name, data).await {
                Ok(s) => {
                    staged.push(s.clone());
                    Some(s)
                }
                Err(e) => {
                    // The cover is already in the store; compensate it.
                    saga::compensate_all(store, &staged).await;
                    return Err(e);
                }
            }
        }
        None => None,
    };

    let mut tx = state.pool.begin().await?;
    let outcome = create_in_tx(
        &mut tx,
        store.provider(),
        owner_id,
        &content,
        &form.technology_ids,
        form.is_pinned,
        form.display_order,
        &cover_staged,
        demo_staged.as_ref(),
    )
    .await;

    match outcome {
        Ok(project) => match tx.commit().await {
            Ok(()) => Ok(project),
            Err(e) => {
                // Deferred constraint violations surface here.
                saga::compensate_all(store, &staged).await;
                Err(e.into())
            }
        },
        Err(e) => {
            drop(tx); // rollback before touching the store
            saga::compensate_all(store, &staged).await;
            Err(e)
        }
    }
}

#[allow(clippy::too_many_arguments)]
async fn create_in_tx(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    provider: &str,
    owner_id: DbId,
    content: &ProjectContent,
    technology_ids: &[DbId],
    requested_pin: bool,
    requested_order: Option<i32>,
    cover: &StagedUpload,
    demo: Option<&StagedUpload>,
) -> AppResult<Project> {
    require_technologies_exist(&mut *tx, technology_ids).await?;

    let snapshot = ProjectRepo::ordering_snapshot(&mut *tx, owner_id).await?;
    let plan = ordering::plan_insert(&snapshot, requested_pin, requested_order);
    apply_insert_plan(&mut *tx, owner_id, &plan).await?;

    let cover_asset = saga::persist(&mut *tx, provider, owner_id, cover).await?;
    let demo_asset_id = match demo {
        Some(staged) => Some(saga::persist(&mut *tx, provider, owner_id, staged).await?.id),
        None => None,
    };

    let project = ProjectRepo::create(
        &mut *tx,
        &CreateProject {
            owner_id,
            name: content.name.clone(),
            short_description: content.short_description.clone(),
            long_description: content.long_description.clone(),
            live_url: content.live_url.clone(),
            repo_url: content.repo_url.clone(),
            status: content.status,
            is_pinned: plan.placement.is_pinned,
            display_order: plan.placement.display_order,
            cover_asset_id: cover_asset.id,
            demo_video_asset_id: demo_asset_id,
        },
    )
    .await?;

    ProjectRepo::replace_technologies(&mut *tx, project.id, technology_ids).await?;
    ProjectRepo::normalize_display_orders(&mut *tx, owner_id).await?;

    Ok(project)
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

/// PUT /api/v1/projects/{id}
///
/// Full content replacement plus optional cover/demo replacement. Old
/// assets are removed only after the transaction commits; a failed
/// transaction compensates the *new* uploads instead.
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(project_id): Path<DbId>,
    mut multipart: Multipart,
) -> AppResult<Json<DataResponse<ProjectDto>>> {
    let form = parse_project_form(&mut multipart).await?;

    let owner_id = user.user_id;
    let section_state = state.clone();
    let project = saga::run_detached(async move {
        update_section(section_state, owner_id, project_id, form).await
    })
    .await?;

    let dtos = build_dtos(&state.pool, owner_id, vec![project]).await?;
    let dto = dtos
        .into_iter()
        .next()
        .ok_or_else(|| AppError::InternalError("Updated project vanished".into()))?;
    Ok(Json(DataResponse { data: dto }))
}

async fn update_section(
    state: AppState,
    owner_id: DbId,
    project_id: DbId,
    form: ProjectForm,
) -> AppResult<Project> {
    let content = validate_content(&form)?;

    // Cheap existence check so nothing gets staged for an unknown id. The
    // authoritative read happens inside the transaction, under the locks
    // taken by the ordering snapshot.
    ProjectRepo::find_by_id(&state.pool, owner_id, project_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id: project_id,
        }))?;

    // Stage replacement uploads before the transaction opens.
    let store = state.asset_store.as_ref();
    let mut staged: Vec<StagedUpload> = Vec::new();

    let new_cover = match form.cover {
        Some((file_name, data)) => {
            let s = saga::stage_upload(store, owner_id, AssetKind::Image, &file_name, data).await?;
            staged.push(s.clone());
            Some(s)
        }
        None => None,
    };
    let new_demo = match form.demo_video {
        Some((file_name, data)) => {
            match saga::stage_upload(store, owner_id, AssetKind::Video, &file_name, data).await {
                Ok(s) => {
                    staged.push(s.clone());
                    Some(s)
                }
                Err(e) => {
                    saga::compensate_all(store, &staged).await;
                    return Err(e);
                }
            }
        }
        None => None,
    };

    let mut tx = state.pool.begin().await?;
    let outcome = update_in_tx(
        &mut tx,
        store.provider(),
        owner_id,
        project_id,
        &content,
        &form.technology_ids,
        form.is_pinned,
        form.display_order,
        form.remove_demo_video,
        new_cover.as_ref(),
        new_demo.as_ref(),
    )
    .await;

    let (project, obsolete_asset_ids) = match outcome {
        Ok(result) => match tx.commit().await {
            Ok(()) => result,
            Err(e) => {
                saga::compensate_all(store, &staged).await;
                return Err(e.into());
            }
        },
        Err(e) => {
            drop(tx);
            saga::compensate_all(store, &staged).await;
            return Err(e);
        }
    };

    // Post-commit cleanup of replaced assets. Failures are logged inside
    // delete_everywhere and must not fail the request.
    for asset_id in obsolete_asset_ids {
        if let Err(e) = saga::delete_everywhere(&state.pool, store, owner_id, asset_id).await {
            tracing::warn!(asset_id, error = %e, "Old asset cleanup failed");
        }
    }

    Ok(project)
}

/// Returns the updated project plus the asset ids the update made
/// obsolete, for post-commit cleanup by the caller.
#[allow(clippy::too_many_arguments)]
async fn update_in_tx(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    provider: &str,
    owner_id: DbId,
    project_id: DbId,
    content: &ProjectContent,
    technology_ids: &[DbId],
    new_pinned: bool,
    new_order: Option<i32>,
    remove_demo_video: bool,
    new_cover: Option<&StagedUpload>,
    new_demo: Option<&StagedUpload>,
) -> AppResult<(Project, Vec<DbId>)> {
    require_technologies_exist(&mut *tx, technology_ids).await?;

    // The snapshot locks the owner's rows; the authoritative read of the
    // subject row comes after it, so the plan inputs cannot go stale under
    // a concurrent writer.
    let snapshot = ProjectRepo::ordering_snapshot(&mut *tx, owner_id).await?;
    let current = ProjectRepo::find_by_id_in_tx(&mut *tx, owner_id, project_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id: project_id,
        }))?;

    let plan = ordering::plan_update(
        &snapshot,
        current.id,
        current.is_pinned,
        current.display_order,
        new_pinned,
        new_order,
    );
    apply_update_plan(&mut *tx, owner_id, current.id, &plan).await?;

    // Persist replacement assets and resolve the final references. Which
    // old assets become garbage is decided from the in-tx row.
    let mut obsolete_asset_ids: Vec<DbId> = Vec::new();
    let cover_asset_id = match new_cover {
        Some(staged) => {
            obsolete_asset_ids.push(current.cover_asset_id);
            saga::persist(&mut *tx, provider, owner_id, staged).await?.id
        }
        None => current.cover_asset_id,
    };
    let demo_video_asset_id = match new_demo {
        Some(staged) => {
            if let Some(old_demo) = current.demo_video_asset_id {
                obsolete_asset_ids.push(old_demo);
            }
            Some(saga::persist(&mut *tx, provider, owner_id, staged).await?.id)
        }
        None if remove_demo_video => {
            if let Some(old_demo) = current.demo_video_asset_id {
                obsolete_asset_ids.push(old_demo);
            }
            None
        }
        None => current.demo_video_asset_id,
    };

    let project = ProjectRepo::update_content(
        &mut *tx,
        owner_id,
        current.id,
        &UpdateProjectContent {
            name: content.name.clone(),
            short_description: content.short_description.clone(),
            long_description: content.long_description.clone(),
            live_url: content.live_url.clone(),
            repo_url: content.repo_url.clone(),
            status: content.status,
            cover_asset_id,
            demo_video_asset_id,
        },
    )
    .await?
    .ok_or(AppError::Core(CoreError::NotFound {
        entity: "Project",
        id: current.id,
    }))?;

    ProjectRepo::replace_technologies(&mut *tx, project.id, technology_ids).await?;
    ProjectRepo::normalize_display_orders(&mut *tx, owner_id).await?;

    // The placement columns may have changed after update_content's read.
    let project = ProjectRepo::find_by_id_in_tx(&mut *tx, owner_id, project.id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id: current.id,
        }))?;

    Ok((project, obsolete_asset_ids))
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

/// DELETE /api/v1/projects/{id}
///
/// Removes the project, its technology joins, and its asset ledger rows in
/// one transaction, then best-effort deletes the blobs. A blob-delete
/// failure after commit is logged and swallowed; the client still gets 204.
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(project_id): Path<DbId>,
) -> AppResult<StatusCode> {
    let owner_id = user.user_id;
    let section_state = state.clone();
    saga::run_detached(async move { delete_section(section_state, owner_id, project_id).await })
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_section(state: AppState, owner_id: DbId, project_id: DbId) -> AppResult<()> {
    let mut tx = state.pool.begin().await?;

    let project = ProjectRepo::find_by_id_in_tx(&mut tx, owner_id, project_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id: project_id,
        }))?;

    let mut asset_ids = vec![project.cover_asset_id];
    if let Some(demo_id) = project.demo_video_asset_id {
        asset_ids.push(demo_id);
    }
    // Snapshot the blob keys now; the ledger rows are gone after commit.
    let assets = AssetRepo::find_by_ids(&state.pool, owner_id, &asset_ids).await?;

    ProjectRepo::remove_technologies(&mut tx, project_id).await?;
    ProjectRepo::delete(&mut tx, owner_id, project_id).await?;
    for asset_id in &asset_ids {
        AssetRepo::delete(&mut tx, owner_id, *asset_id).await?;
    }
    ProjectRepo::normalize_display_orders(&mut tx, owner_id).await?;

    tx.commit().await?;

    // Ledger committed; blob deletes are best-effort from here on.
    for asset in &assets {
        saga::discard_blob(state.asset_store.as_ref(), asset).await;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Plan application
// ---------------------------------------------------------------------------

async fn apply_insert_plan(
    conn: &mut PgConnection,
    owner_id: DbId,
    plan: &InsertPlan,
) -> Result<(), sqlx::Error> {
    if let Some(shift) = &plan.shift {
        ProjectRepo::shift_display_orders(&mut *conn, owner_id, shift.from_order, 1, shift.exclude)
            .await?;
    }
    if let Some(demote) = &plan.demote {
        ProjectRepo::write_order(&mut *conn, demote.project_id, demote.to_order, false).await?;
    }
    Ok(())
}

async fn apply_update_plan(
    conn: &mut PgConnection,
    owner_id: DbId,
    project_id: DbId,
    plan: &UpdatePlan,
) -> Result<(), sqlx::Error> {
    match plan {
        UpdatePlan::Pin { shift, demote } => {
            if let Some(shift) = shift {
                ProjectRepo::shift_display_orders(
                    &mut *conn,
                    owner_id,
                    shift.from_order,
                    1,
                    shift.exclude,
                )
                .await?;
            }
            if let Some(demote) = demote {
                ProjectRepo::write_order(&mut *conn, demote.project_id, demote.to_order, false)
                    .await?;
            }
            ProjectRepo::write_order(&mut *conn, project_id, 0, true).await?;
        }
        UpdatePlan::Unpin { shift, order } | UpdatePlan::Reorder { shift, order } => {
            if let Some(shift) = shift {
                ProjectRepo::shift_display_orders(
                    &mut *conn,
                    owner_id,
                    shift.from_order,
                    1,
                    shift.exclude,
                )
                .await?;
            }
            ProjectRepo::write_order(&mut *conn, project_id, *order, false).await?;
        }
        UpdatePlan::NoChange => {}
    }
    Ok(())
}

async fn require_technologies_exist(
    conn: &mut PgConnection,
    technology_ids: &[DbId],
) -> AppResult<()> {
    if !TechnologyRepo::all_exist(conn, technology_ids).await? {
        return Err(AppError::Core(CoreError::Validation(
            "One or more technology ids do not exist".into(),
        )));
    }
    Ok(())
}
