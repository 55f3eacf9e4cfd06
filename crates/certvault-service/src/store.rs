//! Persistence seams used by the services.
//!
//! Services talk to these traits rather than to the sqlx repositories
//! directly, so the session and correlation logic can be exercised
//! against in-memory stores in tests.

use async_trait::async_trait;
use uuid::Uuid;

use certvault_core::result::AppResult;
use certvault_core::types::{PageRequest, Paginated};
use certvault_database::repositories::{AuditLogRepository, DocumentRepository};
use certvault_entity::audit::{AuditLogEntry, AuditSearchFilter, CreateAuditLogEntry};
use certvault_entity::breadcrumb::BreadcrumbRow;
use certvault_entity::document::{DocumentNode, InspectionStatus, ListQuery, NewDocument};

/// Document tree persistence.
#[async_trait]
pub trait DocumentStore: Send + Sync + std::fmt::Debug + 'static {
    async fn list(&self, query: &ListQuery) -> AppResult<Paginated<DocumentNode>>;
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<DocumentNode>>;
    async fn breadcrumb_row(&self, id: Uuid) -> AppResult<Option<BreadcrumbRow>>;
    async fn insert(&self, doc: &NewDocument) -> AppResult<DocumentNode>;
    async fn rename(&self, id: Uuid, new_name: &str) -> AppResult<DocumentNode>;
    async fn set_status(&self, id: Uuid, status: InspectionStatus) -> AppResult<DocumentNode>;
    async fn delete(&self, id: Uuid) -> AppResult<Option<DocumentNode>>;
}

/// Append-only audit log persistence.
#[async_trait]
pub trait AuditStore: Send + Sync + std::fmt::Debug + 'static {
    async fn append(&self, entry: &CreateAuditLogEntry) -> AppResult<AuditLogEntry>;
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<AuditLogEntry>>;
    async fn search(
        &self,
        filter: &AuditSearchFilter,
        page: &PageRequest,
    ) -> AppResult<Paginated<AuditLogEntry>>;
    async fn recent(&self, limit: u64) -> AppResult<Vec<AuditLogEntry>>;
}

#[async_trait]
impl DocumentStore for DocumentRepository {
    async fn list(&self, query: &ListQuery) -> AppResult<Paginated<DocumentNode>> {
        DocumentRepository::list(self, query).await
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<DocumentNode>> {
        DocumentRepository::find_by_id(self, id).await
    }

    async fn breadcrumb_row(&self, id: Uuid) -> AppResult<Option<BreadcrumbRow>> {
        DocumentRepository::breadcrumb_row(self, id).await
    }

    async fn insert(&self, doc: &NewDocument) -> AppResult<DocumentNode> {
        DocumentRepository::insert(self, doc).await
    }

    async fn rename(&self, id: Uuid, new_name: &str) -> AppResult<DocumentNode> {
        DocumentRepository::rename(self, id, new_name).await
    }

    async fn set_status(&self, id: Uuid, status: InspectionStatus) -> AppResult<DocumentNode> {
        DocumentRepository::set_status(self, id, status).await
    }

    async fn delete(&self, id: Uuid) -> AppResult<Option<DocumentNode>> {
        DocumentRepository::delete(self, id).await
    }
}

#[async_trait]
impl AuditStore for AuditLogRepository {
    async fn append(&self, entry: &CreateAuditLogEntry) -> AppResult<AuditLogEntry> {
        AuditLogRepository::append(self, entry).await
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<AuditLogEntry>> {
        AuditLogRepository::find_by_id(self, id).await
    }

    async fn search(
        &self,
        filter: &AuditSearchFilter,
        page: &PageRequest,
    ) -> AppResult<Paginated<AuditLogEntry>> {
        AuditLogRepository::search(self, filter, page).await
    }

    async fn recent(&self, limit: u64) -> AppResult<Vec<AuditLogEntry>> {
        AuditLogRepository::recent(self, limit).await
    }
}
