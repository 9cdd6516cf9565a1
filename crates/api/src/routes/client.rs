//! Route definitions for the `/api/client` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::client;
use crate::state::AppState;

/// Routes mounted at `/api/client`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/send-email", post(client::send_email))
        .route("/register", post(client::register))
        .route("/login", post(client::login))
        .route("/logout", post(client::logout))
        .route("/verify", get(client::verify))
        .route("/profile", get(client::profile))
}
