pub mod auth;
pub mod health;
pub mod portfolio;
pub mod project;
pub mod technology;

use axum::routing::get;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                    register (public)
/// /auth/login                       login (public)
///
/// /me                               current user profile (auth)
///
/// /projects                         list published, create (auth)
/// /projects/admin                   list all incl. drafts (auth)
/// /projects/{id}                    update, delete (auth)
///
/// /technologies                     list, create (auth)
///
/// /portfolio/{slug}/projects        published projects by slug (public)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Authentication routes (register, login).
        .nest("/auth", auth::router())
        // Current-user profile.
        .route("/me", get(handlers::me::get_me))
        // Project CRUD and ordering.
        .nest("/projects", project::router())
        // Technology catalogue.
        .nest("/technologies", technology::router())
        // Public read-only portfolio.
        .nest("/portfolio", portfolio::router())
}
