//! HTTP-level integration tests for the referer-based asset fallback.
//!
//! Uploaded bundles reference assets by root-absolute paths that miss the
//! `/projects/{id}/` mount; the fallback maps them back into the right
//! project directory using the `Referer` header. Each test seeds extracted
//! files directly on disk and requests a root-absolute asset path.

mod common;

use axum::body::Body;
use axum::http::header::{CONTENT_TYPE, REFERER};
use axum::http::{Method, Request, StatusCode};
use common::{body_string, get, get_with_referer};
use sqlx::PgPool;
use tower::ServiceExt;

/// Create a file (and its parents) under the test app's projects root.
fn seed_file(app: &common::TestApp, relative: &str, contents: &str) {
    let path = app.storage.path().join("projects").join(relative);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, contents).unwrap();
}

/// A sibling of the referring page is found directly (strategy 1).
#[sqlx::test(migrations = "../db/migrations")]
async fn test_resolves_sibling_of_referring_page(pool: PgPool) {
    let app = common::build_test_app(pool).await;
    seed_file(&app, "p1/sub/main.abc123ef.js", "sibling");

    let response = get_with_referer(
        app.router(),
        "/main.abc123ef.js",
        "http://localhost:3000/projects/p1/sub/",
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(CONTENT_TYPE).unwrap(),
        "text/javascript"
    );
    assert_eq!(
        response.headers().get("cache-control").unwrap(),
        "public, max-age=3600"
    );
    assert_eq!(body_string(response).await, "sibling");
}

/// When the sibling guess misses, the project root is tried (strategy 2).
#[sqlx::test(migrations = "../db/migrations")]
async fn test_resolves_from_project_root(pool: PgPool) {
    let app = common::build_test_app(pool).await;
    seed_file(&app, "p2/logo.png", "png-bytes");

    let response = get_with_referer(
        app.router(),
        "/logo.png",
        "http://localhost:3000/projects/p2/sub/index.html",
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers().get(CONTENT_TYPE).unwrap(), "image/png");
    assert_eq!(body_string(response).await, "png-bytes");
}

/// When both the sibling and project-root guesses miss, the dist
/// subfolder is the third guess (strategy 3).
#[sqlx::test(migrations = "../db/migrations")]
async fn test_resolves_from_dist_subfolder(pool: PgPool) {
    let app = common::build_test_app(pool).await;
    seed_file(&app, "p3/dist/style.css", "body {}");

    let response = get_with_referer(
        app.router(),
        "/style.css",
        "http://localhost:3000/projects/p3/sub/",
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers().get(CONTENT_TYPE).unwrap(), "text/css");
    assert_eq!(body_string(response).await, "body {}");
}

/// A hashed asset name anywhere in the project tree is found by the
/// recursive search (strategy 4), even when the request path's directory
/// does not match the file's location.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_recursive_search_for_hashed_asset(pool: PgPool) {
    let app = common::build_test_app(pool).await;
    seed_file(&app, "p4/static/js/chunk-2f8a91bc.js", "chunk");

    let response = get_with_referer(
        app.router(),
        "/assets/chunk-2f8a91bc.js",
        "http://localhost:3000/projects/p4/index.html",
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "chunk");
}

/// Short generic filenames never trigger the recursive search.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_short_names_are_not_searched_recursively(pool: PgPool) {
    let app = common::build_test_app(pool).await;
    seed_file(&app, "p5/static/a.js", "short");

    let response = get_with_referer(
        app.router(),
        "/a.js",
        "http://localhost:3000/projects/p5/index.html",
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

/// Without a Referer the fallback cannot attribute the request to a
/// project and returns 404.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_missing_referer_is_404(pool: PgPool) {
    let app = common::build_test_app(pool).await;
    seed_file(&app, "p6/main.abc123ef.js", "x");

    let response = get(app.router(), "/main.abc123ef.js").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

/// A referer outside /projects/ never resolves.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_non_project_referer_is_404(pool: PgPool) {
    let app = common::build_test_app(pool).await;
    seed_file(&app, "p7/main.abc123ef.js", "x");

    let response = get_with_referer(
        app.router(),
        "/main.abc123ef.js",
        "http://localhost:3000/login",
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

/// Traversal segments in the request path are rejected.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_traversal_request_is_404(pool: PgPool) {
    let app = common::build_test_app(pool).await;

    let response = get_with_referer(
        app.router(),
        "/assets/../../outside.12345678.js",
        "http://localhost:3000/projects/p8/",
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

/// Traversal segments in the referer are rejected too; a `..` project id
/// must not turn the resolver into a read of files above the projects root.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_traversal_referer_is_404(pool: PgPool) {
    let app = common::build_test_app(pool).await;
    // A file one level above the projects root, where strategy 1 would
    // land for a `/projects/../` referer.
    std::fs::write(app.storage.path().join("secret.txt"), "do not serve").unwrap();

    let response = get_with_referer(
        app.router(),
        "/secret.txt",
        "http://localhost:3000/projects/../",
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = get_with_referer(
        app.router(),
        "/secret.txt",
        "http://localhost:3000/projects/p8/../../index.html",
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

/// Only GET requests are resolved.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_non_get_is_404(pool: PgPool) {
    let app = common::build_test_app(pool).await;
    seed_file(&app, "p9/main.abc123ef.js", "x");

    let request = Request::builder()
        .method(Method::POST)
        .uri("/main.abc123ef.js")
        .header(REFERER, "http://localhost:3000/projects/p9/")
        .body(Body::empty())
        .unwrap();
    let response = app.router().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
