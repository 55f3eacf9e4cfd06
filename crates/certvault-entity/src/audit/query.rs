//! Audit log search parameters.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::severity::{AuditCategory, Severity};

/// Server-side filters for paging through the audit log.
///
/// This is distinct from the in-memory list filter applied to
/// already-loaded rows; these conditions are pushed down to the database.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuditSearchFilter {
    /// Restrict to a functional category.
    pub category: Option<AuditCategory>,
    /// Restrict to an exact severity.
    pub severity: Option<Severity>,
    /// Restrict to a single acting user.
    pub user_id: Option<String>,
    /// Only entries at or after this instant.
    pub since: Option<DateTime<Utc>>,
}
