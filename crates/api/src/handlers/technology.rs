//! Handlers for the `/technologies` resource.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use folio_core::slug;
use folio_db::models::technology::{CreateTechnology, Technology};
use folio_db::repositories::TechnologyRepo;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /technologies`.
#[derive(Debug, Deserialize)]
pub struct CreateTechnologyRequest {
    pub name: String,
}

/// GET /api/v1/technologies
pub async fn list(
    State(state): State<AppState>,
    _user: AuthUser,
) -> AppResult<Json<DataResponse<Vec<Technology>>>> {
    let technologies = TechnologyRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: technologies }))
}

/// POST /api/v1/technologies
///
/// Create a technology from a display name; the slug is derived. A
/// duplicate name or slug surfaces as 409 via the `uq_` constraints.
pub async fn create(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(input): Json<CreateTechnologyRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Technology>>)> {
    let name = slug::normalize_name(&input.name);
    let tech_slug = slug::from_name(&name).map_err(AppError::Core)?;

    let technology = TechnologyRepo::create(
        &state.pool,
        &CreateTechnology {
            name,
            slug: tech_slug,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: technology })))
}
