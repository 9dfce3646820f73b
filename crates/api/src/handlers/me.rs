//! Handler for the `/me` resource.

use axum::extract::State;
use axum::Json;
use folio_core::error::CoreError;
use folio_db::repositories::UserRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::auth::UserInfo;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/me
///
/// The authenticated user's own profile.
pub async fn get_me(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<UserInfo>>> {
    let row = UserRepo::find_by_id(&state.pool, user.user_id)
        .await?
        .ok_or_else(|| {
            // A valid token for a deleted account.
            AppError::Core(CoreError::Unauthorized("Account no longer exists".into()))
        })?;

    Ok(Json(DataResponse {
        data: UserInfo {
            id: row.id,
            email: row.email,
            portfolio_slug: row.portfolio_slug,
        },
    }))
}
