//! Listing query parameters.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use certvault_core::types::PageRequest;

/// Parameters for a paginated document listing.
///
/// A non-empty `search` escapes the folder hierarchy: the folder filter is
/// ignored and names are matched flat across the whole visible scope. An
/// empty search restricts results to direct children of `folder_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListQuery {
    /// Folder whose children to list; None for the root level.
    pub folder_id: Option<Uuid>,
    /// Free-text name search (case-insensitive substring).
    pub search: String,
    /// Organization scope; None means the global view.
    pub owner_scope: Option<Uuid>,
    /// Pagination window.
    pub page: PageRequest,
}

impl ListQuery {
    /// Children of a folder, no search.
    pub fn children_of(folder_id: Option<Uuid>, owner_scope: Option<Uuid>, page: PageRequest) -> Self {
        Self {
            folder_id,
            search: String::new(),
            owner_scope,
            page,
        }
    }

    /// Whether this query is a flat search (ignores the folder filter).
    pub fn is_search(&self) -> bool {
        !self.search.trim().is_empty()
    }
}
