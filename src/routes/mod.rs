//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! One Axum router serves the JSON chat endpoints and the static demo page.
//! Static files come from the public root with implicit `.html` resolution
//! (`/about` serves `about.html`). Every response carries
//! `X-Content-Type-Options: nosniff`.

pub mod chat;

use std::path::Path;

use axum::Router;
use axum::extract::{Request, State};
use axum::http::header::X_CONTENT_TYPE_OPTIONS;
use axum::http::{HeaderValue, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use tower::ServiceExt;
use tower::service_fn;
use tower_http::compression::CompressionLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;
use tracing::debug;

use crate::state::AppState;

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;

/// Full application router.
pub fn app(state: AppState) -> Router {
    let public = state.config.public_dir.clone();

    // Second pass for extensionless paths: retry as `<path>.html`.
    let html_pages = ServeDir::new(&public);
    let with_html_extension = service_fn(move |req: Request| {
        let html_pages = html_pages.clone();
        async move { html_pages.oneshot(append_html_extension(req)).await }
    });
    let static_files = ServeDir::new(&public)
        .append_index_html_on_directories(true)
        .fallback(with_html_extension);

    Router::new()
        .route("/api/presets", get(chat::list_presets))
        .route("/api/chat", post(chat::compose))
        .route("/vendor/chart.umd.js", get(vendor_chart))
        .route("/healthz", get(healthz))
        .route_service("/", ServeFile::new(public.join("index.html")))
        .fallback_service(static_files)
        .layer(SetResponseHeaderLayer::overriding(X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff")))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Rewrite `/page` to `/page.html`; paths with an extension or a trailing
/// slash are left alone.
fn append_html_extension(mut req: Request) -> Request {
    let path = req.uri().path();
    if path.ends_with('/') || Path::new(path).extension().is_some() {
        return req;
    }
    let rewritten = match req.uri().query() {
        Some(query) => format!("{path}.html?{query}"),
        None => format!("{path}.html"),
    };
    if let Ok(uri) = rewritten.parse::<Uri>() {
        *req.uri_mut() = uri;
    }
    req
}

/// `GET /vendor/chart.umd.js`: vendored chart bundle, 404 when absent so
/// the page falls back to the CDN copy.
async fn vendor_chart(State(state): State<AppState>, req: Request) -> Response {
    let path = &state.config.chart_vendor_path;
    let present = tokio::fs::metadata(path).await.is_ok_and(|m| m.is_file());
    if !present {
        debug!(path = %path.display(), "vendored chart bundle not found");
        return StatusCode::NOT_FOUND.into_response();
    }
    match ServeFile::new(path).oneshot(req).await {
        Ok(res) => res.into_response(),
        Err(never) => match never {},
    }
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
