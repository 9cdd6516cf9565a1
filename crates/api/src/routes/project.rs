//! Route definitions for the `/api/projects` resource.

use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use axum::Router;

use crate::handlers::project;
use crate::state::AppState;

/// Maximum accepted upload size for project archives.
const MAX_UPLOAD_BYTES: usize = 100 * 1024 * 1024;

/// Routes mounted at `/api/projects`.
///
/// ```text
/// GET    /        -> list
/// POST   /        -> upload (multipart)
/// PUT    /{id}    -> update
/// DELETE /{id}    -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(project::list).post(project::upload))
        .route(
            "/{id}",
            axum::routing::put(project::update).delete(project::delete),
        )
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
}
