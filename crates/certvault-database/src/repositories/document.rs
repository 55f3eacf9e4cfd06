//! Document repository implementation.

use sqlx::PgPool;
use uuid::Uuid;

use certvault_core::error::{AppError, ErrorKind};
use certvault_core::result::AppResult;
use certvault_core::types::Paginated;
use certvault_entity::breadcrumb::BreadcrumbRow;
use certvault_entity::document::{DocumentNode, InspectionStatus, ListQuery, NewDocument};

/// Repository for the document tree (files and folders in one table).
#[derive(Debug, Clone)]
pub struct DocumentRepository {
    pool: PgPool,
}

impl DocumentRepository {
    /// Create a new document repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Paginated listing.
    ///
    /// A non-empty search term escapes the folder hierarchy: names are
    /// matched flat across the whole visible scope and the folder filter
    /// is ignored. An empty search restricts to direct children of the
    /// folder (or root-level nodes). Folders sort before files, then by
    /// name.
    pub async fn list(&self, query: &ListQuery) -> AppResult<Paginated<DocumentNode>> {
        let search = query.search.trim();
        let searching = !search.is_empty();
        let pattern = format!("%{}%", escape_like(search));

        let mut conditions = Vec::new();
        let mut param_idx = 1u32;

        if searching {
            conditions.push(format!("name ILIKE ${param_idx}"));
            param_idx += 1;
        } else if query.folder_id.is_some() {
            conditions.push(format!("parent_id = ${param_idx}"));
            param_idx += 1;
        } else {
            conditions.push("parent_id IS NULL".to_string());
        }

        if query.owner_scope.is_some() {
            conditions.push(format!("owner_id = ${param_idx}"));
            param_idx += 1;
        }

        let where_clause = format!("WHERE {}", conditions.join(" AND "));
        let count_sql = format!("SELECT COUNT(*) FROM documents {where_clause}");
        let select_sql = format!(
            "SELECT * FROM documents {where_clause} \
             ORDER BY (kind = 'folder') DESC, name ASC LIMIT ${param_idx} OFFSET ${}",
            param_idx + 1
        );

        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
        let mut select_query = sqlx::query_as::<_, DocumentNode>(&select_sql);

        if searching {
            count_query = count_query.bind(pattern.clone());
            select_query = select_query.bind(pattern);
        } else if let Some(folder_id) = query.folder_id {
            count_query = count_query.bind(folder_id);
            select_query = select_query.bind(folder_id);
        }
        if let Some(owner) = query.owner_scope {
            count_query = count_query.bind(owner);
            select_query = select_query.bind(owner);
        }

        let total = count_query.fetch_one(&self.pool).await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to count documents", e)
        })?;

        let nodes = select_query
            .bind(query.page.limit() as i64)
            .bind(query.page.offset() as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to list documents", e)
            })?;

        Ok(Paginated::new(nodes, total as u64, &query.page))
    }

    /// Find a document by ID.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<DocumentNode>> {
        sqlx::query_as::<_, DocumentNode>("SELECT * FROM documents WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find document", e))
    }

    /// Fetch the minimal breadcrumb row for a folder.
    pub async fn breadcrumb_row(&self, id: Uuid) -> AppResult<Option<BreadcrumbRow>> {
        sqlx::query_as::<_, BreadcrumbRow>(
            "SELECT id, name, parent_id FROM documents WHERE id = $1 AND kind = 'folder'",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find folder", e))
    }

    /// Insert a new document node.
    pub async fn insert(&self, doc: &NewDocument) -> AppResult<DocumentNode> {
        sqlx::query_as::<_, DocumentNode>(
            "INSERT INTO documents (parent_id, name, kind, size, owner_id, storage_path, metadata) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *",
        )
        .bind(doc.parent_id)
        .bind(&doc.name)
        .bind(doc.kind.as_str())
        .bind(&doc.size)
        .bind(doc.owner_id)
        .bind(&doc.storage_path)
        .bind(doc.metadata.to_value())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err)
                if db_err.constraint() == Some("documents_parent_name_owner_key") =>
            {
                AppError::conflict(format!("An entry named '{}' already exists here", doc.name))
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to create document", e),
        })
    }

    /// Rename a document node.
    pub async fn rename(&self, id: Uuid, new_name: &str) -> AppResult<DocumentNode> {
        sqlx::query_as::<_, DocumentNode>(
            "UPDATE documents SET name = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(new_name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to rename document", e))?
        .ok_or_else(|| AppError::not_found(format!("Document {id} not found")))
    }

    /// Update the inspection status inside the metadata bag.
    pub async fn set_status(
        &self,
        id: Uuid,
        status: InspectionStatus,
    ) -> AppResult<DocumentNode> {
        sqlx::query_as::<_, DocumentNode>(
            "UPDATE documents \
             SET metadata = jsonb_set(metadata, '{status}', to_jsonb($2::text), true), \
                 updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update status", e))?
        .ok_or_else(|| AppError::not_found(format!("Document {id} not found")))
    }

    /// Delete a document row, returning the removed node when it existed.
    ///
    /// Physical object removal is the caller's concern: folder rows carry
    /// the sentinel storage path and have nothing to remove.
    pub async fn delete(&self, id: Uuid) -> AppResult<Option<DocumentNode>> {
        sqlx::query_as::<_, DocumentNode>("DELETE FROM documents WHERE id = $1 RETURNING *")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete document", e))
    }
}

/// Escape `LIKE` metacharacters in a user-supplied search term.
fn escape_like(term: &str) -> String {
    term.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("10%_a\\b"), "10\\%\\_a\\\\b");
        assert_eq!(escape_like("plain"), "plain");
    }
}
