//! Route definitions for the `/projects` resource.

use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use axum::Router;

use crate::handlers::project;
use crate::state::AppState;

/// Upper bound on a multipart body: the 50 MiB video limit plus the cover
/// image and form-field overhead.
const MAX_MULTIPART_BYTES: usize = 64 * 1024 * 1024;

/// Routes mounted at `/projects`.
///
/// ```text
/// GET    /          -> list (published)
/// POST   /          -> create (multipart)
/// GET    /admin     -> list_admin (all)
/// PUT    /{id}      -> update (multipart)
/// DELETE /{id}      -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(project::list).post(project::create))
        .route("/admin", get(project::list_admin))
        .route("/{id}", axum::routing::put(project::update).delete(project::delete))
        .layer(DefaultBodyLimit::max(MAX_MULTIPART_BYTES))
}
