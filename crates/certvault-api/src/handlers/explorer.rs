//! Explorer session handlers.
//!
//! Sessions hold the stateful view (folder, page, search, entries) on
//! the server; these endpoints drive one session's inputs and read its
//! current view. Sessions belong to the user who opened them; other
//! callers get a not-found answer.

use axum::Json;
use axum::extract::{Path, State};
use uuid::Uuid;

use crate::dto::request::{KeystrokeBody, NavigateBody, PageBody};
use crate::error::ApiResult;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// POST /api/explorer/sessions
pub async fn open_session(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<serde_json::Value>> {
    let id = state.explorer.open(&auth).await?;
    let view = state.explorer.get(&auth, id)?.view().await;

    Ok(Json(serde_json::json!({
        "success": true,
        "data": { "sessionId": id, "view": view }
    })))
}

/// GET /api/explorer/sessions/{id}
pub async fn get_view(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    let view = state.explorer.get(&auth, id)?.view().await;
    Ok(Json(serde_json::json!({ "success": true, "data": view })))
}

/// POST /api/explorer/sessions/{id}/navigate
pub async fn navigate(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(body): Json<NavigateBody>,
) -> ApiResult<Json<serde_json::Value>> {
    let session = state.explorer.get(&auth, id)?;
    session.navigate_to(body.folder_id).await;
    Ok(Json(serde_json::json!({ "success": true, "data": session.view().await })))
}

/// POST /api/explorer/sessions/{id}/search
///
/// Records a keystroke; the term is committed only after the debounce
/// quiet period, so the returned view usually still shows the previous
/// results.
pub async fn keystroke(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(body): Json<KeystrokeBody>,
) -> ApiResult<Json<serde_json::Value>> {
    state.explorer.keystroke(&auth, id, body.term)?;
    Ok(Json(serde_json::json!({ "success": true })))
}

/// POST /api/explorer/sessions/{id}/page
pub async fn set_page(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(body): Json<PageBody>,
) -> ApiResult<Json<serde_json::Value>> {
    let session = state.explorer.get(&auth, id)?;
    session.set_page(body.page).await;
    Ok(Json(serde_json::json!({ "success": true, "data": session.view().await })))
}

/// POST /api/explorer/sessions/{id}/refresh
pub async fn refresh(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    let session = state.explorer.get(&auth, id)?;
    session.refresh().await;
    Ok(Json(serde_json::json!({ "success": true, "data": session.view().await })))
}

/// DELETE /api/explorer/sessions/{id}
pub async fn close_session(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    let closed = state.explorer.close(&auth, id);
    Ok(Json(serde_json::json!({ "success": true, "data": { "closed": closed } })))
}
