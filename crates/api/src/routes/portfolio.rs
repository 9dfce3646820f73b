//! Route definitions for the public `/portfolio` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::portfolio;
use crate::state::AppState;

/// Routes mounted at `/portfolio`. No authentication.
///
/// ```text
/// GET /{slug}/projects  -> list_published
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/{slug}/projects", get(portfolio::list_published))
}
