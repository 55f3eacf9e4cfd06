//! Route definitions for the CertVault HTTP API.
//!
//! All routes are mounted under `/api` and receive `AppState` via
//! Axum's `State` extractor.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::{delete, get, post, put},
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use certvault_core::config::app::CorsConfig;

use crate::handlers;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let max_upload = state.config.storage.max_upload_size_bytes as usize;

    let api_routes = Router::new()
        .merge(document_routes())
        .merge(explorer_routes())
        .merge(audit_routes())
        .merge(health_routes());

    let cors = build_cors_layer(&state.config.server.cors);

    Router::new()
        .nest("/api", api_routes)
        .layer(DefaultBodyLimit::max(max_upload))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Document listing, CRUD, upload, download.
fn document_routes() -> Router<AppState> {
    Router::new()
        .route("/documents", get(handlers::documents::list_documents))
        .route("/documents", delete(handlers::documents::delete_documents))
        .route("/documents/upload", post(handlers::documents::upload_document))
        .route("/documents/folders", post(handlers::documents::create_folder))
        .route("/documents/{id}", get(handlers::documents::get_document))
        .route("/documents/{id}/name", put(handlers::documents::rename_document))
        .route("/documents/{id}/status", put(handlers::documents::review_document))
        .route(
            "/documents/{id}/download",
            get(handlers::documents::download_document),
        )
}

/// Stateful explorer sessions.
fn explorer_routes() -> Router<AppState> {
    Router::new()
        .route("/explorer/sessions", post(handlers::explorer::open_session))
        .route("/explorer/sessions/{id}", get(handlers::explorer::get_view))
        .route(
            "/explorer/sessions/{id}",
            delete(handlers::explorer::close_session),
        )
        .route(
            "/explorer/sessions/{id}/navigate",
            post(handlers::explorer::navigate),
        )
        .route(
            "/explorer/sessions/{id}/search",
            post(handlers::explorer::keystroke),
        )
        .route(
            "/explorer/sessions/{id}/page",
            post(handlers::explorer::set_page),
        )
        .route(
            "/explorer/sessions/{id}/refresh",
            post(handlers::explorer::refresh),
        )
}

/// Audit search and correlation (admin only).
fn audit_routes() -> Router<AppState> {
    Router::new()
        .route("/audit", get(handlers::audit::search_audit))
        .route("/audit/{id}", get(handlers::audit::get_entry))
        .route("/audit/{id}/related", get(handlers::audit::correlate_entry))
}

/// Liveness and dependency health.
fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/health/detailed", get(handlers::health::health_detailed))
}

/// Build the CORS layer from configuration.
fn build_cors_layer(config: &CorsConfig) -> CorsLayer {
    let mut layer = CorsLayer::new();

    if config.allowed_origins.iter().any(|o| o == "*") {
        layer = layer.allow_origin(Any);
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        layer = layer.allow_origin(origins);
    }

    let methods: Vec<Method> = config
        .allowed_methods
        .iter()
        .filter_map(|m| m.parse().ok())
        .collect();
    layer = layer.allow_methods(methods);

    if config.allowed_headers.iter().any(|h| h == "*") {
        layer = layer.allow_headers(Any);
    }

    layer
}
