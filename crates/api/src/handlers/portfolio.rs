//! Public portfolio handlers: read-only project listings by portfolio slug.

use axum::extract::{Path, State};
use axum::Json;
use folio_db::repositories::{ProjectRepo, UserRepo};

use crate::error::{AppError, AppResult};
use crate::handlers::project::{build_dtos, ProjectDto};
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/portfolio/{slug}/projects
///
/// Published projects for the portfolio addressed by slug, pinned first,
/// then by display order. No authentication.
pub async fn list_published(
    State(state): State<AppState>,
    Path(portfolio_slug): Path<String>,
) -> AppResult<Json<DataResponse<Vec<ProjectDto>>>> {
    let owner_id = UserRepo::owner_id_by_slug(&state.pool, &portfolio_slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No portfolio named '{portfolio_slug}'")))?;

    let projects = ProjectRepo::list_published(&state.pool, owner_id).await?;
    let dtos = build_dtos(&state.pool, owner_id, projects).await?;
    Ok(Json(DataResponse { data: dtos }))
}
