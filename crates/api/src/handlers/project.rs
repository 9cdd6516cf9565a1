//! Handlers for the `/api/projects` resource: archive upload, listing,
//! metadata updates, and deletion.

use axum::extract::{Multipart, Path, State};
use axum::Json;
use pagedock_core::archive::{extract_archive, ArchiveError};
use pagedock_core::entry::{find_entry_file, ENTRY_FILE_NAME};
use pagedock_core::types::ProjectId;
use pagedock_db::models::project::{CreateProject, Project, UpdateProject};
use pagedock_db::repositories::ProjectRepo;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::{Envelope, CODE_BAD_REQUEST, CODE_NOT_FOUND};
use crate::state::AppState;

/// Default project name when the upload form omits one.
const DEFAULT_PROJECT_NAME: &str = "Untitled project";

/// POST /api/projects
///
/// Multipart upload: one archive file field plus optional `name`,
/// `description`, and `backendUrl` text fields.
///
/// Pipeline: stage the archive -> extract into `{projects_root}/{id}` ->
/// locate the entry file -> insert the record. Extraction must succeed (or
/// the whole upload fails with 500) before anything is written to the
/// database, so a failed extraction never leaves a project record behind.
/// The reverse is not transactional: a failed insert after extraction
/// leaves an orphaned directory.
pub async fn upload(
    _auth: AuthUser,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<Json<Envelope<Project>>> {
    let mut archive_bytes: Option<Vec<u8>> = None;
    let mut name = String::new();
    let mut description = String::new();
    let mut backend_url = String::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.file_name().is_some() {
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(e.to_string()))?;
            archive_bytes = Some(data.to_vec());
            continue;
        }

        let field_name = field.name().unwrap_or_default().to_string();
        let value = field
            .text()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        match field_name.as_str() {
            "name" => name = value,
            "description" => description = value,
            "backendUrl" | "backend_url" => backend_url = value,
            _ => {}
        }
    }

    let Some(archive_bytes) = archive_bytes else {
        return Ok(Json(Envelope::soft(CODE_BAD_REQUEST, "No file uploaded")));
    };

    let id: ProjectId = Uuid::new_v4();
    let directory_name = id.to_string();

    // Stage the archive on disk, then extract and locate the entry file in
    // a blocking task (zip extraction and the directory walk are sync I/O).
    tokio::fs::create_dir_all(&state.config.upload_dir)
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to create upload dir: {e}")))?;
    let staged = state.config.upload_dir.join(format!("{directory_name}.zip"));
    tokio::fs::write(&staged, &archive_bytes)
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to stage upload: {e}")))?;

    let dest = state.config.projects_root.join(&directory_name);
    let entry = {
        let staged = staged.clone();
        let dest = dest.clone();
        tokio::task::spawn_blocking(move || -> Result<_, ArchiveError> {
            extract_archive(&staged, &dest)?;
            Ok(find_entry_file(&dest)?)
        })
        .await
        .map_err(|e| AppError::InternalError(format!("Extraction task failed: {e}")))??
    };

    // Soft fallback: no entry file found still deploys, the preview link
    // just points at a nonexistent root index.html.
    let relative_entry = entry
        .map(|p| p.to_string_lossy().replace('\\', "/"))
        .unwrap_or_else(|| ENTRY_FILE_NAME.to_string());

    let preview_path = format!("/projects/{directory_name}/{relative_entry}");

    let project = ProjectRepo::create(
        &state.pool,
        &CreateProject {
            id,
            name: if name.is_empty() {
                DEFAULT_PROJECT_NAME.to_string()
            } else {
                name
            },
            description,
            backend_url,
            directory_name,
            preview_path,
        },
    )
    .await?;

    tracing::info!(
        project_id = %project.id,
        preview_path = %project.preview_path,
        "Project uploaded"
    );

    Ok(Json(Envelope::ok("Upload successful", project)))
}

/// GET /api/projects
///
/// All projects, most recently uploaded first.
pub async fn list(
    _auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<Envelope<Vec<Project>>>> {
    let projects = ProjectRepo::list(&state.pool).await?;
    Ok(Json(Envelope::ok("Projects fetched", projects)))
}

/// PUT /api/projects/{id}
///
/// Update name/description/backendUrl. An unknown id is a soft 404 inside
/// a success-shaped envelope so the calling UI never sees a transport error.
pub async fn update(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<ProjectId>,
    Json(input): Json<UpdateProject>,
) -> AppResult<Json<Envelope<Project>>> {
    match ProjectRepo::update(&state.pool, id, &input).await? {
        Some(project) => Ok(Json(Envelope::ok("Update successful", project))),
        None => Ok(Json(Envelope::soft(CODE_NOT_FOUND, "Project not found"))),
    }
}

/// DELETE /api/projects/{id}
///
/// Remove the extracted directory (best-effort; a directory already removed
/// by hand is not an error) and then the record. The two steps are
/// independent, with no rollback.
pub async fn delete(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<ProjectId>,
) -> AppResult<Json<Envelope<()>>> {
    let Some(project) = ProjectRepo::find_by_id(&state.pool, id).await? else {
        return Ok(Json(Envelope::soft(CODE_NOT_FOUND, "Project not found")));
    };

    let dir = state.config.projects_root.join(&project.directory_name);
    match tokio::fs::remove_dir_all(&dir).await {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => {
            // Best-effort: keep going so the record is still removed.
            tracing::warn!(project_id = %id, error = %e, "Failed to remove project directory");
        }
    }

    ProjectRepo::delete_record(&state.pool, id).await?;

    tracing::info!(project_id = %id, "Project deleted");
    Ok(Json(Envelope::ok_empty("Delete successful")))
}
