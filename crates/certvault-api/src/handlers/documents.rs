//! Document CRUD, upload, download handlers.

use std::time::Duration;

use axum::Json;
use axum::body::Body;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::Response;
use bytes::Bytes;
use uuid::Uuid;

use certvault_core::error::AppError;
use certvault_core::types::PageRequest;
use certvault_service::document::{CreateFolderRequest, UploadRequest, with_admin_timeout};

use crate::dto::request::{CreateFolderBody, DeleteBody, ListDocumentsParams, RenameBody, ReviewBody};
use crate::error::ApiResult;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/documents?folder_id=...&search=...&page=...
pub async fn list_documents(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<ListDocumentsParams>,
) -> ApiResult<Json<serde_json::Value>> {
    let page = PageRequest::new(
        params.page,
        params.page_size.unwrap_or(state.config.explorer.page_size),
    );
    let result = state
        .document_service
        .list(&auth, params.folder_id, &params.search, params.owner_id, page)
        .await?;

    Ok(Json(serde_json::json!({
        "success": true,
        "data": {
            "items": result.items,
            "total": result.total,
            "hasMore": result.has_more,
        }
    })))
}

/// GET /api/documents/{id}
pub async fn get_document(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    let doc = state.document_service.get(&auth, id).await?;
    Ok(Json(serde_json::json!({ "success": true, "data": doc })))
}

/// GET /api/documents/{id}/download
pub async fn download_document(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Response> {
    let (doc, content) = state.document_service.download(&auth, id).await?;

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/octet-stream")
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", doc.name),
        )
        .header(header::CONTENT_LENGTH, content.len())
        .body(Body::from(content))
        .map_err(|e| AppError::internal(format!("Response build failed: {e}")))?;

    Ok(response)
}

/// POST /api/documents/upload (multipart)
pub async fn upload_document(
    State(state): State<AppState>,
    auth: AuthUser,
    mut multipart: Multipart,
) -> ApiResult<Json<serde_json::Value>> {
    let mut file_name: Option<String> = None;
    let mut content: Option<Bytes> = None;
    let mut parent_id: Option<Uuid> = None;
    let mut owner_id: Option<Uuid> = None;
    let mut metadata: Option<serde_json::Value> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation(format!("Invalid multipart payload: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                file_name = field.file_name().map(str::to_string);
                content = Some(field.bytes().await.map_err(|e| {
                    AppError::validation(format!("Failed to read file field: {e}"))
                })?);
            }
            "parent_id" => {
                let raw = read_text(field).await?;
                parent_id = Some(
                    raw.parse::<Uuid>()
                        .map_err(|_| AppError::validation("Invalid parent_id"))?,
                );
            }
            "owner_id" => {
                let raw = read_text(field).await?;
                owner_id = Some(
                    raw.parse::<Uuid>()
                        .map_err(|_| AppError::validation("Invalid owner_id"))?,
                );
            }
            "metadata" => {
                let raw = read_text(field).await?;
                metadata = Some(
                    serde_json::from_str(&raw)
                        .map_err(|_| AppError::validation("Invalid metadata JSON"))?,
                );
            }
            _ => {}
        }
    }

    let content = content.ok_or_else(|| AppError::validation("Missing file field"))?;
    let file_name = file_name.ok_or_else(|| AppError::validation("Missing file name"))?;

    let doc = state
        .document_service
        .upload(
            &auth,
            UploadRequest {
                parent_id,
                file_name,
                content,
                owner_id,
                metadata,
            },
        )
        .await?;

    Ok(Json(serde_json::json!({ "success": true, "data": doc })))
}

/// POST /api/documents/folders
pub async fn create_folder(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<CreateFolderBody>,
) -> ApiResult<Json<serde_json::Value>> {
    let folder = state
        .document_service
        .create_folder(
            &auth,
            CreateFolderRequest {
                parent_id: body.parent_id,
                name: body.name,
                owner_id: body.owner_id,
                evidence: body.evidence,
            },
        )
        .await?;

    Ok(Json(serde_json::json!({ "success": true, "data": folder })))
}

/// PUT /api/documents/{id}/name
pub async fn rename_document(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(body): Json<RenameBody>,
) -> ApiResult<Json<serde_json::Value>> {
    let doc = state.document_service.rename(&auth, id, &body.name).await?;
    Ok(Json(serde_json::json!({ "success": true, "data": doc })))
}

/// PUT /api/documents/{id}/status
pub async fn review_document(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(body): Json<ReviewBody>,
) -> ApiResult<Json<serde_json::Value>> {
    let doc = state
        .document_service
        .set_status(&auth, id, body.status)
        .await?;
    Ok(Json(serde_json::json!({ "success": true, "data": doc })))
}

/// DELETE /api/documents (batch, JSON body of ids)
///
/// Deletion runs against the hosted backend with admin credentials, so
/// it carries the admin call time budget.
pub async fn delete_documents(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<DeleteBody>,
) -> ApiResult<Json<serde_json::Value>> {
    if body.ids.is_empty() {
        return Err(AppError::validation("No document ids given").into());
    }
    let budget = Duration::from_secs(state.config.explorer.admin_call_timeout_seconds);
    let removed = with_admin_timeout(
        budget,
        state.document_service.delete(Some(&auth), &body.ids),
    )
    .await?;

    Ok(Json(serde_json::json!({
        "success": true,
        "data": { "removed": removed }
    })))
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> Result<String, AppError> {
    field
        .text()
        .await
        .map_err(|e| AppError::validation(format!("Failed to read multipart field: {e}")))
}
