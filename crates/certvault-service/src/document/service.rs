//! Document service: listing plus the mutation set (upload, folder
//! creation, rename, review status, deletion).

use std::sync::Arc;

use bytes::Bytes;
use serde_json::json;
use uuid::Uuid;

use crate::audit::AuditService;
use crate::context::RequestContext;
use crate::store::DocumentStore;
use certvault_core::error::AppError;
use certvault_core::result::AppResult;
use certvault_core::traits::ObjectStore;
use certvault_core::types::{PageRequest, Paginated};
use certvault_entity::audit::{AuditOutcome, Severity};
use certvault_entity::document::{
    CertificateMetadata, DocumentKind, DocumentNode, InspectionStatus, ListQuery, NewDocument,
};
use certvault_storage::path::object_path;

/// An upload request, already extracted from the transport layer.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub parent_id: Option<Uuid>,
    pub file_name: String,
    pub content: Bytes,
    /// Explicit owning organization; defaults to the caller's.
    pub owner_id: Option<Uuid>,
    /// Raw certificate metadata, normalized before storage.
    pub metadata: Option<serde_json::Value>,
}

/// A folder creation request.
#[derive(Debug, Clone)]
pub struct CreateFolderRequest {
    pub parent_id: Option<Uuid>,
    pub name: String,
    pub owner_id: Option<Uuid>,
    /// Mark the folder as an inspection evidence folder.
    pub evidence: bool,
}

/// Service for document reads and mutations.
#[derive(Debug, Clone)]
pub struct DocumentService {
    store: Arc<dyn DocumentStore>,
    objects: Arc<dyn ObjectStore>,
    audit: AuditService,
}

impl DocumentService {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        objects: Arc<dyn ObjectStore>,
        audit: AuditService,
    ) -> Self {
        Self {
            store,
            objects,
            audit,
        }
    }

    /// Stateless paginated listing scoped to the caller.
    pub async fn list(
        &self,
        ctx: &RequestContext,
        folder_id: Option<Uuid>,
        search: &str,
        owner_id: Option<Uuid>,
        page: PageRequest,
    ) -> AppResult<Paginated<DocumentNode>> {
        let owner_scope = ctx.effective_owner_scope(owner_id)?;
        let query = ListQuery {
            folder_id,
            search: search.to_string(),
            owner_scope,
            page,
        };
        self.store.list(&query).await
    }

    /// Fetch a single document visible to the caller.
    ///
    /// Out-of-scope documents are reported as not found rather than
    /// forbidden, so clients cannot probe for foreign IDs.
    pub async fn get(&self, ctx: &RequestContext, id: Uuid) -> AppResult<DocumentNode> {
        let doc = self
            .store
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Document {id} not found")))?;
        if !ctx.role.can_see_global_scope() && Some(doc.owner_id) != ctx.organization_id {
            return Err(AppError::not_found(format!("Document {id} not found")));
        }
        Ok(doc)
    }

    /// Fetch a document's stored bytes for preview or download.
    pub async fn download(
        &self,
        ctx: &RequestContext,
        id: Uuid,
    ) -> AppResult<(DocumentNode, Bytes)> {
        let doc = self.get(ctx, id).await?;
        if doc.is_folder() {
            return Err(AppError::validation("Folders have no downloadable content"));
        }
        let content = self.objects.read_bytes(&doc.storage_path).await?;
        Ok((doc, content))
    }

    /// Upload a certificate file: object first, then the database row.
    pub async fn upload(
        &self,
        ctx: &RequestContext,
        req: UploadRequest,
    ) -> AppResult<DocumentNode> {
        let file_name = req.file_name.trim();
        if file_name.is_empty() {
            return Err(AppError::validation("File name must not be empty"));
        }
        let owner_id = ctx.resolve_mutation_owner(req.owner_id)?;

        let unique_id = Uuid::new_v4();
        let storage_path = object_path(owner_id, req.parent_id, unique_id, file_name);
        let size = format_size(req.content.len() as u64);

        self.objects.write(&storage_path, req.content).await?;

        let doc = NewDocument {
            parent_id: req.parent_id,
            name: file_name.to_string(),
            kind: DocumentKind::from_file_name(file_name),
            size,
            owner_id,
            storage_path: storage_path.clone(),
            metadata: CertificateMetadata::normalize(req.metadata.unwrap_or_else(|| json!({}))),
        };

        let created = match self.store.insert(&doc).await {
            Ok(created) => created,
            Err(e) => {
                // The object is already written; clean it up so a failed
                // insert does not leak storage.
                if let Err(cleanup) = self.objects.delete(&storage_path).await {
                    tracing::warn!(
                        path = %storage_path,
                        error = %cleanup,
                        "Failed to remove object after insert failure"
                    );
                }
                return Err(e);
            }
        };

        self.audit
            .record_action(
                Some(ctx),
                "file.upload",
                &created.name,
                Severity::Info,
                AuditOutcome::Success,
                json!({ "documentId": created.id, "parentId": created.parent_id }),
            )
            .await;
        Ok(created)
    }

    /// Create a folder row. Folders carry the sentinel storage path and
    /// never touch object storage.
    pub async fn create_folder(
        &self,
        ctx: &RequestContext,
        req: CreateFolderRequest,
    ) -> AppResult<DocumentNode> {
        let name = req.name.trim();
        if name.is_empty() {
            return Err(AppError::validation("Folder name must not be empty"));
        }
        let owner_id = ctx.resolve_mutation_owner(req.owner_id)?;

        let metadata = if req.evidence {
            CertificateMetadata::EvidenceFolder {
                status: InspectionStatus::default(),
            }
        } else {
            CertificateMetadata::default()
        };
        let created = self
            .store
            .insert(&NewDocument::folder(req.parent_id, name, owner_id, metadata))
            .await?;

        self.audit
            .record_action(
                Some(ctx),
                "folder.create",
                &created.name,
                Severity::Info,
                AuditOutcome::Success,
                json!({ "documentId": created.id }),
            )
            .await;
        Ok(created)
    }

    /// Rename a document or folder.
    pub async fn rename(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        new_name: &str,
    ) -> AppResult<DocumentNode> {
        let new_name = new_name.trim();
        if new_name.is_empty() {
            return Err(AppError::validation("Name must not be empty"));
        }
        self.get(ctx, id).await?;
        let renamed = self.store.rename(id, new_name).await?;

        self.audit
            .record_action(
                Some(ctx),
                "file.rename",
                &renamed.name,
                Severity::Info,
                AuditOutcome::Success,
                json!({ "documentId": renamed.id }),
            )
            .await;
        Ok(renamed)
    }

    /// Set the inspection status of a certificate. Admin and quality
    /// roles only.
    pub async fn set_status(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        status: InspectionStatus,
    ) -> AppResult<DocumentNode> {
        if !ctx.role.can_set_inspection_status() {
            return Err(AppError::forbidden(
                "Inspection review requires admin or quality role",
            ));
        }
        let updated = self.store.set_status(id, status).await?;

        self.audit
            .record_action(
                Some(ctx),
                "file.review",
                &updated.name,
                Severity::Info,
                AuditOutcome::Success,
                json!({ "documentId": updated.id, "status": status.as_str() }),
            )
            .await;
        Ok(updated)
    }

    /// Delete a batch of documents and/or folders.
    ///
    /// Each row is removed first; only file rows then have their stored
    /// object deleted. A failed object removal is logged and does not
    /// undo the row deletion. An unattributed call (no actor) proceeds
    /// but is flagged in the log and audited under the placeholder
    /// identity. Returns the number of rows removed.
    pub async fn delete(
        &self,
        actor: Option<&RequestContext>,
        ids: &[Uuid],
    ) -> AppResult<u64> {
        if actor.is_none() {
            tracing::warn!(count = ids.len(), "Delete requested without actor attribution");
        }

        let mut removed = 0u64;
        for &id in ids {
            if let Some(ctx) = actor {
                if !ctx.role.can_see_global_scope() {
                    match self.store.find_by_id(id).await? {
                        Some(doc) if Some(doc.owner_id) == ctx.organization_id => {}
                        Some(_) => {
                            tracing::warn!(%id, "Delete skipped: document outside caller scope");
                            continue;
                        }
                        None => continue,
                    }
                }
            }

            let Some(doc) = self.store.delete(id).await? else {
                continue;
            };
            if !doc.is_folder() {
                if let Err(e) = self.objects.delete(&doc.storage_path).await {
                    tracing::error!(
                        path = %doc.storage_path,
                        error = %e,
                        "Failed to remove stored object for deleted document"
                    );
                }
            }
            removed += 1;

            self.audit
                .record_action(
                    actor,
                    "file.delete",
                    &doc.name,
                    Severity::Warning,
                    AuditOutcome::Success,
                    json!({ "documentId": doc.id }),
                )
                .await;
        }
        Ok(removed)
    }
}

/// Render a byte count as the human-readable size stored on the row.
pub fn format_size(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;
    const GB: f64 = MB * 1024.0;

    let b = bytes as f64;
    if b >= GB {
        format!("{:.1} GB", b / GB)
    } else if b >= MB {
        format!("{:.1} MB", b / MB)
    } else if b >= KB {
        format!("{:.1} KB", b / KB)
    } else {
        format!("{bytes} B")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::Utc;

    use crate::store::AuditStore;
    use certvault_entity::audit::{AuditLogEntry, AuditSearchFilter, CreateAuditLogEntry};
    use certvault_entity::breadcrumb::BreadcrumbRow;
    use certvault_entity::document::FOLDER_STORAGE_PATH;
    use certvault_entity::user::Role;

    #[derive(Debug, Default)]
    struct MemDocStore {
        docs: Mutex<HashMap<Uuid, DocumentNode>>,
    }

    impl MemDocStore {
        fn materialize(doc: &NewDocument) -> DocumentNode {
            DocumentNode {
                id: Uuid::new_v4(),
                parent_id: doc.parent_id,
                name: doc.name.clone(),
                kind: doc.kind,
                size: doc.size.clone(),
                updated_at: Utc::now(),
                owner_id: doc.owner_id,
                storage_path: doc.storage_path.clone(),
                version_number: 1,
                metadata: doc.metadata.clone(),
            }
        }
    }

    #[async_trait]
    impl DocumentStore for MemDocStore {
        async fn list(&self, query: &ListQuery) -> AppResult<Paginated<DocumentNode>> {
            let docs = self.docs.lock().unwrap();
            let mut items: Vec<DocumentNode> = docs
                .values()
                .filter(|d| {
                    if query.is_search() {
                        d.name
                            .to_lowercase()
                            .contains(&query.search.trim().to_lowercase())
                    } else {
                        d.parent_id == query.folder_id
                    }
                })
                .filter(|d| query.owner_scope.is_none_or(|o| d.owner_id == o))
                .cloned()
                .collect();
            items.sort_by(|a, b| {
                b.is_folder()
                    .cmp(&a.is_folder())
                    .then_with(|| a.name.cmp(&b.name))
            });
            let total = items.len() as u64;
            let items = items
                .into_iter()
                .skip(query.page.offset() as usize)
                .take(query.page.limit() as usize)
                .collect();
            Ok(Paginated::new(items, total, &query.page))
        }

        async fn find_by_id(&self, id: Uuid) -> AppResult<Option<DocumentNode>> {
            Ok(self.docs.lock().unwrap().get(&id).cloned())
        }

        async fn breadcrumb_row(&self, id: Uuid) -> AppResult<Option<BreadcrumbRow>> {
            Ok(self.docs.lock().unwrap().get(&id).and_then(|d| {
                d.is_folder().then(|| BreadcrumbRow {
                    id: d.id,
                    name: d.name.clone(),
                    parent_id: d.parent_id,
                })
            }))
        }

        async fn insert(&self, doc: &NewDocument) -> AppResult<DocumentNode> {
            let mut docs = self.docs.lock().unwrap();
            let duplicate = docs.values().any(|d| {
                d.parent_id == doc.parent_id && d.name == doc.name && d.owner_id == doc.owner_id
            });
            if duplicate {
                return Err(AppError::conflict(format!(
                    "An entry named '{}' already exists here",
                    doc.name
                )));
            }
            let materialized = Self::materialize(doc);
            docs.insert(materialized.id, materialized.clone());
            Ok(materialized)
        }

        async fn rename(&self, id: Uuid, new_name: &str) -> AppResult<DocumentNode> {
            let mut docs = self.docs.lock().unwrap();
            let doc = docs
                .get_mut(&id)
                .ok_or_else(|| AppError::not_found(format!("Document {id} not found")))?;
            doc.name = new_name.to_string();
            doc.updated_at = Utc::now();
            Ok(doc.clone())
        }

        async fn set_status(
            &self,
            id: Uuid,
            status: InspectionStatus,
        ) -> AppResult<DocumentNode> {
            let mut docs = self.docs.lock().unwrap();
            let doc = docs
                .get_mut(&id)
                .ok_or_else(|| AppError::not_found(format!("Document {id} not found")))?;
            doc.metadata.set_status(status);
            doc.updated_at = Utc::now();
            Ok(doc.clone())
        }

        async fn delete(&self, id: Uuid) -> AppResult<Option<DocumentNode>> {
            Ok(self.docs.lock().unwrap().remove(&id))
        }
    }

    #[derive(Debug, Default)]
    struct MemObjectStore {
        objects: Mutex<HashMap<String, Bytes>>,
    }

    #[async_trait]
    impl ObjectStore for MemObjectStore {
        fn provider_type(&self) -> &str {
            "memory"
        }

        async fn health_check(&self) -> AppResult<bool> {
            Ok(true)
        }

        async fn write(&self, path: &str, data: Bytes) -> AppResult<()> {
            self.objects.lock().unwrap().insert(path.to_string(), data);
            Ok(())
        }

        async fn read_bytes(&self, path: &str) -> AppResult<Bytes> {
            self.objects
                .lock()
                .unwrap()
                .get(path)
                .cloned()
                .ok_or_else(|| AppError::not_found(format!("Object not found: {path}")))
        }

        async fn delete(&self, path: &str) -> AppResult<()> {
            self.objects.lock().unwrap().remove(path);
            Ok(())
        }

        async fn exists(&self, path: &str) -> AppResult<bool> {
            Ok(self.objects.lock().unwrap().contains_key(path))
        }
    }

    #[derive(Debug, Default)]
    struct NullAuditStore;

    #[async_trait]
    impl AuditStore for NullAuditStore {
        async fn append(&self, entry: &CreateAuditLogEntry) -> AppResult<AuditLogEntry> {
            Ok(AuditLogEntry {
                id: Uuid::new_v4(),
                created_at: Utc::now(),
                user_id: entry.user_id.clone(),
                user_name: entry.user_name.clone(),
                user_role: entry.user_role.clone(),
                action: entry.action.clone(),
                category: entry.category,
                target: entry.target.clone(),
                severity: entry.severity,
                status: entry.status,
                ip: entry.ip.clone(),
                user_agent: entry.user_agent.clone(),
                request_id: entry.request_id,
                metadata: entry.metadata_with_snapshot(),
            })
        }

        async fn find_by_id(&self, _id: Uuid) -> AppResult<Option<AuditLogEntry>> {
            Ok(None)
        }

        async fn search(
            &self,
            _filter: &AuditSearchFilter,
            page: &PageRequest,
        ) -> AppResult<Paginated<AuditLogEntry>> {
            Ok(Paginated::new(Vec::new(), 0, page))
        }

        async fn recent(&self, _limit: u64) -> AppResult<Vec<AuditLogEntry>> {
            Ok(Vec::new())
        }
    }

    struct Fixture {
        service: DocumentService,
        docs: Arc<MemDocStore>,
        objects: Arc<MemObjectStore>,
    }

    fn fixture() -> Fixture {
        let docs = Arc::new(MemDocStore::default());
        let objects = Arc::new(MemObjectStore::default());
        let audit = AuditService::new(Arc::new(NullAuditStore));
        let service = DocumentService::new(
            Arc::clone(&docs) as Arc<dyn DocumentStore>,
            Arc::clone(&objects) as Arc<dyn ObjectStore>,
            audit,
        );
        Fixture {
            service,
            docs,
            objects,
        }
    }

    fn quality(org: Uuid) -> RequestContext {
        RequestContext::new("q-1", "Ana Souza", Role::Quality, Some(org))
    }

    #[tokio::test]
    async fn test_upload_writes_object_then_row() {
        let fx = fixture();
        let org = Uuid::new_v4();
        let ctx = quality(org);

        let doc = fx
            .service
            .upload(
                &ctx,
                UploadRequest {
                    parent_id: None,
                    file_name: "Certificado Aço 01.pdf".into(),
                    content: Bytes::from(vec![0u8; 1536]),
                    owner_id: None,
                    metadata: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(doc.kind, DocumentKind::Pdf);
        assert_eq!(doc.size, "1.5 KB");
        assert_eq!(doc.owner_id, org);
        assert_eq!(doc.metadata.status(), InspectionStatus::Pending);
        assert!(doc.storage_path.starts_with(&format!("{org}/root/")));
        assert!(doc.storage_path.ends_with("Certificado_Aco_01.pdf"));
        assert!(fx.objects.objects.lock().unwrap().contains_key(&doc.storage_path));
    }

    #[tokio::test]
    async fn test_upload_without_owner_is_rejected_before_any_write() {
        let fx = fixture();
        let ctx = RequestContext::new("q-1", "Ana", Role::Quality, None);

        let result = fx
            .service
            .upload(
                &ctx,
                UploadRequest {
                    parent_id: None,
                    file_name: "cert.pdf".into(),
                    content: Bytes::from_static(b"x"),
                    owner_id: None,
                    metadata: None,
                },
            )
            .await;

        assert!(result.is_err());
        assert!(fx.objects.objects.lock().unwrap().is_empty());
        assert!(fx.docs.docs.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_insert_cleans_up_written_object() {
        let fx = fixture();
        let ctx = quality(Uuid::new_v4());
        let req = UploadRequest {
            parent_id: None,
            file_name: "cert.pdf".into(),
            content: Bytes::from_static(b"x"),
            owner_id: None,
            metadata: None,
        };

        fx.service.upload(&ctx, req.clone()).await.unwrap();
        let err = fx.service.upload(&ctx, req).await.unwrap_err();

        assert_eq!(err.kind, certvault_core::error::ErrorKind::Conflict);
        // Only the first upload's object remains.
        assert_eq!(fx.objects.objects.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_folder_creation_never_touches_object_storage() {
        let fx = fixture();
        let ctx = quality(Uuid::new_v4());

        let folder = fx
            .service
            .create_folder(
                &ctx,
                CreateFolderRequest {
                    parent_id: None,
                    name: "Lote A".into(),
                    owner_id: None,
                    evidence: false,
                },
            )
            .await
            .unwrap();

        assert_eq!(folder.storage_path, FOLDER_STORAGE_PATH);
        assert!(folder.is_folder());
        assert!(fx.objects.objects.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_mixed_batch_removes_only_file_objects() {
        let fx = fixture();
        let ctx = quality(Uuid::new_v4());

        let folder = fx
            .service
            .create_folder(
                &ctx,
                CreateFolderRequest {
                    parent_id: None,
                    name: "Lote A".into(),
                    owner_id: None,
                    evidence: false,
                },
            )
            .await
            .unwrap();
        let file = fx
            .service
            .upload(
                &ctx,
                UploadRequest {
                    parent_id: Some(folder.id),
                    file_name: "cert.pdf".into(),
                    content: Bytes::from_static(b"pdf"),
                    owner_id: None,
                    metadata: None,
                },
            )
            .await
            .unwrap();

        let removed = fx
            .service
            .delete(Some(&ctx), &[folder.id, file.id])
            .await
            .unwrap();

        assert_eq!(removed, 2);
        assert!(fx.docs.docs.lock().unwrap().is_empty());
        assert!(fx.objects.objects.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unattributed_delete_proceeds() {
        let fx = fixture();
        let ctx = quality(Uuid::new_v4());
        let file = fx
            .service
            .upload(
                &ctx,
                UploadRequest {
                    parent_id: None,
                    file_name: "cert.pdf".into(),
                    content: Bytes::from_static(b"pdf"),
                    owner_id: None,
                    metadata: None,
                },
            )
            .await
            .unwrap();

        let removed = fx.service.delete(None, &[file.id]).await.unwrap();
        assert_eq!(removed, 1);
        assert!(fx.docs.docs.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_client_cannot_delete_foreign_documents() {
        let fx = fixture();
        let owner_org = Uuid::new_v4();
        let file = fx
            .service
            .upload(
                &quality(owner_org),
                UploadRequest {
                    parent_id: None,
                    file_name: "cert.pdf".into(),
                    content: Bytes::from_static(b"pdf"),
                    owner_id: None,
                    metadata: None,
                },
            )
            .await
            .unwrap();

        let intruder = RequestContext::new("c-1", "Client", Role::Client, Some(Uuid::new_v4()));
        let removed = fx.service.delete(Some(&intruder), &[file.id]).await.unwrap();

        assert_eq!(removed, 0);
        assert!(fx.docs.docs.lock().unwrap().contains_key(&file.id));
    }

    #[tokio::test]
    async fn test_status_review_requires_reviewer_role() {
        let fx = fixture();
        let org = Uuid::new_v4();
        let file = fx
            .service
            .upload(
                &quality(org),
                UploadRequest {
                    parent_id: None,
                    file_name: "cert.pdf".into(),
                    content: Bytes::from_static(b"pdf"),
                    owner_id: None,
                    metadata: None,
                },
            )
            .await
            .unwrap();

        let client = RequestContext::new("c-1", "Client", Role::Client, Some(org));
        assert!(
            fx.service
                .set_status(&client, file.id, InspectionStatus::Approved)
                .await
                .is_err()
        );

        let updated = fx
            .service
            .set_status(&quality(org), file.id, InspectionStatus::Approved)
            .await
            .unwrap();
        assert_eq!(updated.metadata.status(), InspectionStatus::Approved);
    }

    #[tokio::test]
    async fn test_rename_rejects_blank_names() {
        let fx = fixture();
        let ctx = quality(Uuid::new_v4());
        assert!(fx.service.rename(&ctx, Uuid::new_v4(), "   ").await.is_err());
    }

    #[test]
    fn test_format_size_steps() {
        assert_eq!(format_size(742), "742 B");
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(3 * 1024 * 1024), "3.0 MB");
        assert_eq!(format_size(2_415_919_104), "2.2 GB");
    }
}
