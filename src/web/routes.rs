//! Web API router construction and shared response utilities.

use axum::{
    Router,
    http::HeaderValue,
    response::{IntoResponse, Response},
    routing::get,
};

use std::time::Duration;

use axum::response::Json;

use crate::state::AppState;
use crate::web::middleware::request_id::RequestIdLayer;
use crate::web::{hierarchy, schedule, status};
use tower_http::{compression::CompressionLayer, timeout::TimeoutLayer};

/// Cache-Control presets.
pub mod cache {
    /// Hierarchy lists change at most a few times per term.
    pub const HIERARCHY: &str = "private, max-age=300";
    /// Schedules are fetched live on every request.
    pub const SCHEDULE: &str = "no-store";
}

/// Wraps a JSON response with a `Cache-Control` header.
pub fn with_cache_control<T: serde::Serialize>(value: T, header: &'static str) -> Response {
    let mut response = Json(value).into_response();
    response.headers_mut().insert(
        axum::http::header::CACHE_CONTROL,
        HeaderValue::from_static(header),
    );
    response
}

/// Creates the web server router
pub fn create_router(app_state: AppState) -> Router {
    let api_router = Router::new()
        .route("/health", get(status::health))
        .route("/status", get(status::status))
        .route("/departments", get(hierarchy::departments))
        .route("/schools", get(hierarchy::schools))
        .route("/semesters", get(hierarchy::semesters))
        .route("/classes", get(hierarchy::classes))
        .route("/subclasses", get(hierarchy::subclasses))
        .route("/schedule", get(schedule::schedule))
        .with_state(app_state);

    Router::new().nest("/api", api_router).layer((
        // Outermost: per-request ID span + severity-proportional response logging.
        RequestIdLayer,
        CompressionLayer::new()
            .zstd(true)
            .br(true)
            .gzip(true)
            .quality(tower_http::CompressionLevel::Fastest),
        TimeoutLayer::new(Duration::from_secs(60)),
    ))
}
