//! Static file serving for the embedded data-entry form.
//!
//! The form is a plain HTML/JS/CSS page compiled into the binary, so the
//! server runs from any directory without a separate frontend build.

use axum::{
    body::Body,
    extract::Request,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use rust_embed::Embed;
use std::path::Path;

/// Embedded form assets from `web/static`.
#[derive(Embed)]
#[folder = "web/static"]
#[include = "*.html"]
#[include = "*.js"]
#[include = "*.css"]
#[include = "*.svg"]
#[include = "*.ico"]
pub struct StaticAssets;

/// Serves static files with fallback to `index.html`.
///
/// 1. Serves the exact requested path
/// 2. Returns 404 for unknown paths that look like files (have an extension)
///    and for unknown `/api/` paths
/// 3. Serves `index.html` for everything else
pub async fn serve_static(request: Request) -> Response {
    let path = request.uri().path().trim_start_matches('/');

    if path.is_empty() {
        return serve_file("index.html");
    }

    if let Some(content) = StaticAssets::get(path) {
        return file_response(path, content.data.as_ref());
    }

    let looks_like_file = Path::new(path)
        .extension()
        .is_some_and(|ext| !ext.is_empty());
    if looks_like_file || path.starts_with("api/") {
        return (StatusCode::NOT_FOUND, "Not found").into_response();
    }

    serve_file("index.html")
}

/// Serves a specific file from embedded assets.
fn serve_file(path: &str) -> Response {
    match StaticAssets::get(path) {
        Some(content) => file_response(path, content.data.as_ref()),
        None => (StatusCode::NOT_FOUND, "File not found").into_response(),
    }
}

/// Creates an HTTP response for a file with appropriate content type.
fn file_response(path: &str, content: &[u8]) -> Response {
    let mime = mime_guess::from_path(path).first_or_octet_stream();

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, mime.as_ref())
        .header(header::CACHE_CONTROL, cache_control_for_path(path))
        .body(Body::from(content.to_vec()))
        .unwrap_or_else(|_| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to create response",
            )
                .into_response()
        })
}

/// HTML always revalidates; scripts and styles are cached briefly.
fn cache_control_for_path(path: &str) -> &'static str {
    if Path::new(path)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("html"))
    {
        "no-cache, must-revalidate"
    } else {
        "public, max-age=3600"
    }
}

/// Returns true if the form was embedded.
#[must_use]
pub fn has_embedded_assets() -> bool {
    StaticAssets::get("index.html").is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_control_for_path() {
        assert_eq!(
            cache_control_for_path("index.html"),
            "no-cache, must-revalidate"
        );
        assert_eq!(cache_control_for_path("app.js"), "public, max-age=3600");
        assert_eq!(cache_control_for_path("style.css"), "public, max-age=3600");
    }

    #[test]
    fn test_form_is_embedded() {
        assert!(has_embedded_assets());
        assert!(StaticAssets::get("app.js").is_some());
        assert!(StaticAssets::get("style.css").is_some());
    }
}
