//! Audit log repository implementation.
//!
//! The audit log is append-only: there is no update or delete here.

use sqlx::PgPool;
use uuid::Uuid;

use certvault_core::error::{AppError, ErrorKind};
use certvault_core::result::AppResult;
use certvault_core::types::{PageRequest, Paginated};
use certvault_entity::audit::{AuditLogEntry, AuditSearchFilter, CreateAuditLogEntry};

/// Repository for audit log entries.
#[derive(Debug, Clone)]
pub struct AuditLogRepository {
    pool: PgPool,
}

impl AuditLogRepository {
    /// Create a new audit log repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find an audit entry by ID.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<AuditLogEntry>> {
        sqlx::query_as::<_, AuditLogEntry>("SELECT * FROM audit_log WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find audit entry", e)
            })
    }

    /// Append an audit entry. The actor's name and role are folded into
    /// the metadata bag as a write-time snapshot.
    pub async fn append(&self, entry: &CreateAuditLogEntry) -> AppResult<AuditLogEntry> {
        sqlx::query_as::<_, AuditLogEntry>(
            "INSERT INTO audit_log \
             (user_id, action, category, target, severity, status, ip, user_agent, request_id, metadata) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) RETURNING *",
        )
        .bind(&entry.user_id)
        .bind(&entry.action)
        .bind(entry.category.as_str())
        .bind(&entry.target)
        .bind(entry.severity.as_str())
        .bind(entry.status.as_str())
        .bind(&entry.ip)
        .bind(&entry.user_agent)
        .bind(entry.request_id)
        .bind(entry.metadata_with_snapshot())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to append audit entry", e))
    }

    /// Search the audit log with optional filters, newest first.
    pub async fn search(
        &self,
        filter: &AuditSearchFilter,
        page: &PageRequest,
    ) -> AppResult<Paginated<AuditLogEntry>> {
        let mut conditions = Vec::new();
        let mut param_idx = 1u32;

        if filter.category.is_some() {
            conditions.push(format!("category = ${param_idx}"));
            param_idx += 1;
        }
        if filter.severity.is_some() {
            conditions.push(format!("severity = ${param_idx}"));
            param_idx += 1;
        }
        if filter.user_id.is_some() {
            conditions.push(format!("user_id = ${param_idx}"));
            param_idx += 1;
        }
        if filter.since.is_some() {
            conditions.push(format!("created_at >= ${param_idx}"));
            param_idx += 1;
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let count_sql = format!("SELECT COUNT(*) FROM audit_log {where_clause}");
        let select_sql = format!(
            "SELECT * FROM audit_log {where_clause} \
             ORDER BY created_at DESC LIMIT ${param_idx} OFFSET ${}",
            param_idx + 1
        );

        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
        let mut select_query = sqlx::query_as::<_, AuditLogEntry>(&select_sql);

        if let Some(category) = filter.category {
            count_query = count_query.bind(category.as_str());
            select_query = select_query.bind(category.as_str());
        }
        if let Some(severity) = filter.severity {
            count_query = count_query.bind(severity.as_str());
            select_query = select_query.bind(severity.as_str());
        }
        if let Some(user_id) = &filter.user_id {
            count_query = count_query.bind(user_id.clone());
            select_query = select_query.bind(user_id.clone());
        }
        if let Some(since) = filter.since {
            count_query = count_query.bind(since);
            select_query = select_query.bind(since);
        }

        let total = count_query.fetch_one(&self.pool).await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to count audit entries", e)
        })?;

        let entries = select_query
            .bind(page.limit() as i64)
            .bind(page.offset() as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to search audit log", e)
            })?;

        Ok(Paginated::new(entries, total as u64, page))
    }

    /// Fetch the most recent entries, newest first. Used as the working
    /// window for correlation.
    pub async fn recent(&self, limit: u64) -> AppResult<Vec<AuditLogEntry>> {
        sqlx::query_as::<_, AuditLogEntry>(
            "SELECT * FROM audit_log ORDER BY created_at DESC LIMIT $1",
        )
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to fetch recent audit entries", e)
        })
    }
}
