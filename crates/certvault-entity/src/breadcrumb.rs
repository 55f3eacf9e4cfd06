//! Breadcrumb trail types for folder navigation.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One entry in a breadcrumb trail. The synthetic root carries `id: None`
/// and a role-dependent label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breadcrumb {
    /// Folder ID; None for the synthetic root entry.
    pub id: Option<Uuid>,
    /// Display label.
    pub name: String,
}

impl Breadcrumb {
    /// The synthetic root entry with a role-appropriate label.
    pub fn root(label: impl Into<String>) -> Self {
        Self {
            id: None,
            name: label.into(),
        }
    }
}

/// The minimal row fetched while walking a folder's parent chain.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct BreadcrumbRow {
    /// Folder ID.
    pub id: Uuid,
    /// Folder name.
    pub name: String,
    /// Parent folder ID; None means this folder sits at the root.
    pub parent_id: Option<Uuid>,
}
