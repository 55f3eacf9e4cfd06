//! Audit log handlers. All routes are admin-only; the service enforces
//! the capability and the extractor already blocks other roles at the
//! route prefix.

use std::time::Duration;

use axum::Json;
use axum::extract::{Path, Query, State};
use uuid::Uuid;

use certvault_core::types::PageRequest;
use certvault_entity::audit::AuditSearchFilter;
use certvault_service::audit::LogFilter;
use certvault_service::document::with_admin_timeout;

use crate::dto::request::AuditSearchParams;
use crate::error::ApiResult;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/audit?category=...&severity=...&user_id=...&since=...
pub async fn search_audit(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<AuditSearchParams>,
) -> ApiResult<Json<serde_json::Value>> {
    let filter = AuditSearchFilter {
        category: params.category,
        severity: params.severity,
        user_id: params.user_id,
        since: params.since,
    };
    let page = PageRequest::new(
        params.page,
        params.page_size.unwrap_or(state.config.explorer.page_size),
    );

    let budget = admin_budget(&state);
    let result = with_admin_timeout(budget, state.audit_service.search(&auth, &filter, &page))
        .await?;

    // The text filter narrows the loaded page only; totals still
    // describe the backend query.
    let items = match params.text {
        Some(text) if !text.trim().is_empty() => {
            let text_filter = LogFilter {
                text,
                severity: None,
            };
            text_filter.apply(&result.items)
        }
        _ => result.items,
    };

    Ok(Json(serde_json::json!({
        "success": true,
        "data": {
            "items": items,
            "total": result.total,
            "hasMore": result.has_more,
        }
    })))
}

/// GET /api/audit/{id}
pub async fn get_entry(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    let entry = state.audit_service.entry(&auth, id).await?;
    Ok(Json(serde_json::json!({ "success": true, "data": entry })))
}

/// GET /api/audit/{id}/related
pub async fn correlate_entry(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    let budget = admin_budget(&state);
    let (target, correlation) =
        with_admin_timeout(budget, state.audit_service.correlate(&auth, id)).await?;

    Ok(Json(serde_json::json!({
        "success": true,
        "data": {
            "target": target,
            "related": correlation.related,
            "riskScore": correlation.risk_score,
        }
    })))
}

fn admin_budget(state: &AppState) -> Duration {
    Duration::from_secs(state.config.explorer.admin_call_timeout_seconds)
}
