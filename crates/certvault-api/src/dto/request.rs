//! Request body and query parameter DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use certvault_entity::audit::{AuditCategory, Severity};
use certvault_entity::document::InspectionStatus;

/// Query parameters for the stateless document listing.
#[derive(Debug, Clone, Deserialize)]
pub struct ListDocumentsParams {
    pub folder_id: Option<Uuid>,
    #[serde(default)]
    pub search: String,
    /// Explicit owner scope (ignored for client callers).
    pub owner_id: Option<Uuid>,
    #[serde(default = "default_page")]
    pub page: u64,
    pub page_size: Option<u64>,
}

fn default_page() -> u64 {
    1
}

/// Body for folder creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFolderBody {
    pub name: String,
    pub parent_id: Option<Uuid>,
    pub owner_id: Option<Uuid>,
    #[serde(default)]
    pub evidence: bool,
}

/// Body for renaming a document or folder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenameBody {
    pub name: String,
}

/// Body for setting the inspection status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewBody {
    pub status: InspectionStatus,
}

/// Body for batch deletion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteBody {
    pub ids: Vec<Uuid>,
}

/// Query parameters for audit log search.
#[derive(Debug, Clone, Deserialize)]
pub struct AuditSearchParams {
    pub category: Option<AuditCategory>,
    pub severity: Option<Severity>,
    pub user_id: Option<String>,
    pub since: Option<DateTime<Utc>>,
    /// Free-text filter applied in memory over the loaded page
    /// (actor name, action, target, raw IP substring).
    pub text: Option<String>,
    #[serde(default = "default_page")]
    pub page: u64,
    pub page_size: Option<u64>,
}

/// Body for explorer session navigation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavigateBody {
    /// Target folder; `None` returns to the root level.
    pub folder_id: Option<Uuid>,
}

/// Body for a raw search keystroke.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeystrokeBody {
    /// The full search term as currently typed.
    pub term: String,
}

/// Body for jumping to a listing page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageBody {
    pub page: u64,
}
