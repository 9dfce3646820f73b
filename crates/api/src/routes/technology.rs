//! Route definitions for the `/technologies` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::technology;
use crate::state::AppState;

/// Routes mounted at `/technologies`.
///
/// ```text
/// GET  /   -> list
/// POST /   -> create
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(technology::list).post(technology::create))
}
