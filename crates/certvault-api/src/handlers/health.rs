//! Health check handlers.

use axum::Json;
use axum::extract::State;

use crate::error::ApiResult;
use crate::state::AppState;

/// GET /api/health
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// GET /api/health/detailed
pub async fn health_detailed(State(state): State<AppState>) -> ApiResult<Json<serde_json::Value>> {
    let database = match sqlx::query("SELECT 1").execute(&state.db_pool).await {
        Ok(_) => "connected",
        Err(e) => {
            tracing::warn!(error = %e, "Database health check failed");
            "unavailable"
        }
    };
    let storage = match state.object_store.health_check().await {
        Ok(true) => "available",
        _ => "unavailable",
    };

    Ok(Json(serde_json::json!({
        "status": if database == "connected" && storage == "available" { "ok" } else { "degraded" },
        "database": database,
        "storage": storage,
        "storage_provider": state.object_store.provider_type(),
        "open_sessions": state.explorer.len(),
    })))
}
