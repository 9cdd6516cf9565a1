//! Repository for the `projects` table.

use pagedock_core::types::ProjectId;
use sqlx::PgPool;

use crate::models::project::{CreateProject, Project, UpdateProject};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, name, description, backend_url, directory_name, status, preview_path, uploaded_at";

/// Provides CRUD operations for uploaded projects.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a freshly uploaded project, returning the created row.
    ///
    /// `uploaded_at` and `status` take their column defaults (`NOW()`,
    /// `'deployed'`); neither is ever mutated afterwards.
    pub async fn create(pool: &PgPool, input: &CreateProject) -> Result<Project, sqlx::Error> {
        let query = format!(
            "INSERT INTO projects (id, name, description, backend_url, directory_name, preview_path)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(input.id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.backend_url)
            .bind(&input.directory_name)
            .bind(&input.preview_path)
            .fetch_one(pool)
            .await
    }

    /// Find a project by id.
    pub async fn find_by_id(
        pool: &PgPool,
        id: ProjectId,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all projects, most recently uploaded first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects ORDER BY uploaded_at DESC");
        sqlx::query_as::<_, Project>(&query).fetch_all(pool).await
    }

    /// Update name/description/backend_url. Only non-`None` fields are
    /// applied. Returns `None` when no row with the given id exists; callers
    /// surface that as a soft condition, not a hard error.
    pub async fn update(
        pool: &PgPool,
        id: ProjectId,
        input: &UpdateProject,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                backend_url = COALESCE($4, backend_url)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.backend_url)
            .fetch_optional(pool)
            .await
    }

    /// Delete the database record for a project. Returns `true` if a row was
    /// removed. Directory removal is the caller's responsibility and is
    /// independent of this step.
    pub async fn delete_record(pool: &PgPool, id: ProjectId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
