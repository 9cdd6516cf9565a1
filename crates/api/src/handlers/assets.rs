//! Router fallback that maps unresolved GETs back into uploaded project
//! directories.
//!
//! Uploaded bundles often reference assets by root-absolute paths
//! (`/main.abc123ef.js`) that escape the `/projects/{id}/` mount and land
//! here. The referring page tells us which project the request belongs to;
//! `pagedock_core::resolve` supplies the candidate locations, tried in
//! order, and the first existing file is served. Everything else falls
//! through to a plain 404. Resolution results are not cached; every request
//! re-checks the filesystem.

use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use pagedock_core::resolve::{
    candidate_paths, find_file_by_name, parse_referer_path, sanitize_request_path,
    wants_recursive_search, PROJECTS_PREFIX,
};

use crate::state::AppState;

/// Fallback handler for requests no route matched.
pub async fn resolve_asset(State(state): State<AppState>, req: Request) -> Response {
    if req.method() != Method::GET {
        return not_found();
    }

    let request_path = req.uri().path().to_string();
    // API and canonical static paths never belong to an uploaded bundle;
    // if they reached the fallback they are genuine 404s.
    if request_path.starts_with("/api") || request_path.starts_with(PROJECTS_PREFIX) {
        return not_found();
    }

    let Some(referer) = req
        .headers()
        .get(header::REFERER)
        .and_then(|v| v.to_str().ok())
    else {
        return not_found();
    };

    let Some(referer) = parse_referer_path(referer_url_path(referer)) else {
        return not_found();
    };

    let Some(relative) = sanitize_request_path(&request_path) else {
        return not_found();
    };

    // Strategies 1-3: fixed candidate locations, first existing file wins.
    for (strategy, candidate) in candidate_paths(&state.config.projects_root, &referer, &relative)
        .into_iter()
        .enumerate()
    {
        if tokio::fs::metadata(&candidate)
            .await
            .map(|m| m.is_file())
            .unwrap_or(false)
        {
            tracing::debug!(
                path = %request_path,
                strategy = strategy + 1,
                file = %candidate.display(),
                "Asset resolved"
            );
            return serve_file(&candidate).await;
        }
    }

    // Strategy 4: recursive filename search, hashed-asset names only.
    if wants_recursive_search(&relative) {
        let filename = relative
            .rsplit('/')
            .next()
            .unwrap_or(relative.as_str())
            .to_string();
        let project_root = state.config.projects_root.join(&referer.project_id);

        let found = tokio::task::spawn_blocking(move || find_file_by_name(&project_root, &filename))
            .await
            .ok()
            .and_then(|r| r.ok())
            .flatten();

        if let Some(found) = found {
            tracing::debug!(path = %request_path, file = %found.display(), "Asset resolved (recursive)");
            return serve_file(&found).await;
        }
    }

    tracing::debug!(path = %request_path, project_id = %referer.project_id, "All resolution strategies missed");
    not_found()
}

/// Extract the path component of a `Referer` value.
///
/// Accepts both absolute URLs (`http://host/projects/x/`) and bare paths.
/// Query string and fragment are dropped.
fn referer_url_path(referer: &str) -> &str {
    let rest = referer
        .split_once("://")
        .map(|(_, rest)| rest)
        .unwrap_or(referer);
    let path = match rest.find('/') {
        Some(idx) => &rest[idx..],
        None => "/",
    };
    let path = path.split('?').next().unwrap_or(path);
    path.split('#').next().unwrap_or(path)
}

fn not_found() -> Response {
    StatusCode::NOT_FOUND.into_response()
}

/// Serve a resolved file from disk.
async fn serve_file(path: &std::path::Path) -> Response {
    let data = match tokio::fs::read(path).await {
        Ok(data) => data,
        // Raced with a delete, or unreadable: treat as a miss.
        Err(e) => {
            tracing::warn!(file = %path.display(), error = %e, "Resolved file vanished before read");
            return not_found();
        }
    };

    let content_type = content_type_for_extension(&path.to_string_lossy());

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CONTENT_LENGTH, data.len().to_string())
        .header(
            header::CACHE_CONTROL,
            HeaderValue::from_static("public, max-age=3600"),
        )
        .body(Body::from(data))
        .unwrap()
}

fn content_type_for_extension(path: &str) -> &'static str {
    let ext = path.rsplit('.').next().unwrap_or("").to_lowercase();
    match ext.as_str() {
        "html" | "htm" => "text/html; charset=utf-8",
        "js" | "mjs" => "text/javascript",
        "css" => "text/css",
        "json" | "map" => "application/json",
        "svg" => "image/svg+xml",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "ico" => "image/x-icon",
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "ttf" => "font/ttf",
        "wasm" => "application/wasm",
        "txt" => "text/plain; charset=utf-8",
        _ => "application/octet-stream",
    }
}
