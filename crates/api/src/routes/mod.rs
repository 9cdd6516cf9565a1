pub mod client;
pub mod health;
pub mod project;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /client/send-email      POST  issue a verification code (public)
/// /client/register        POST  create an account (public)
/// /client/login           POST  login with username or email (public)
/// /client/logout          POST  stateless logout (public)
/// /client/verify          GET   validate the Bearer token
/// /client/profile         GET   current account (requires auth)
///
/// /projects               GET   list, newest first (requires auth)
/// /projects               POST  multipart archive upload (requires auth)
/// /projects/{id}          PUT   update metadata (requires auth)
/// /projects/{id}          DELETE remove directory + record (requires auth)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/client", client::router())
        .nest("/projects", project::router())
}
