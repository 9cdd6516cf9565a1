use std::sync::Arc;

use crate::cache::VerificationCache;
use crate::config::ServerConfig;
use crate::email::EmailDelivery;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: pagedock_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Verification-code cache (Redis, or in-memory when unconfigured).
    pub cache: Arc<dyn VerificationCache>,
    /// SMTP mailer; `None` when `SMTP_HOST` is unset (codes are logged).
    pub mailer: Option<Arc<EmailDelivery>>,
}
