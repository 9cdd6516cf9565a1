//! Request handlers.
//!
//! Each submodule provides async handler functions for one resource.
//! Handlers delegate to `pagedock_db` repositories and `pagedock_core`
//! domain logic, and map infrastructure errors via [`crate::error::AppError`].
//! Business outcomes are returned in the `{ code, msg, data }` envelope.

pub mod assets;
pub mod client;
pub mod project;
