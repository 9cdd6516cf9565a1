//! Project entity model and DTOs.

use chrono::{DateTime, Utc};
use pagedock_core::types::ProjectId;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A project row from the `projects` table.
///
/// Serialized camelCase to match the JSON contract consumed by the
/// management UI (`backendUrl`, `previewPath`, ...).
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    pub description: String,
    pub backend_url: String,
    /// Internal filesystem handle; always equals `id` in string form.
    pub directory_name: String,
    pub status: String,
    /// `/projects/{id}/{relative_entry_path}`, computed once at upload.
    pub preview_path: String,
    pub uploaded_at: DateTime<Utc>,
}

/// DTO for inserting a freshly uploaded project.
#[derive(Debug, Clone)]
pub struct CreateProject {
    pub id: ProjectId,
    pub name: String,
    pub description: String,
    pub backend_url: String,
    pub directory_name: String,
    pub preview_path: String,
}

/// DTO for updating project metadata. Only these three fields are mutable;
/// extraction artifacts and the preview path are never touched by updates.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProject {
    pub name: Option<String>,
    pub description: Option<String>,
    pub backend_url: Option<String>,
}
