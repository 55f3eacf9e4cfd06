//! Audit log entry entity model.
//!
//! The database row stores the actor's display name and role inside the
//! `metadata` JSON bag: a denormalized snapshot taken at write time, never
//! joined live. Reads lift that snapshot back into typed fields.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgRow;
use sqlx::{FromRow, Row};
use uuid::Uuid;

use super::severity::{AuditCategory, AuditOutcome, Severity};

/// Fallback used when a snapshot field is absent from the metadata bag.
const UNKNOWN: &str = "unknown";

/// An immutable audit log entry recording a user action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditLogEntry {
    /// Unique audit entry identifier.
    pub id: Uuid,
    /// When the action occurred.
    pub created_at: DateTime<Utc>,
    /// The acting user's ID (external identity subject; `"unknown"` when
    /// no actor was attributed).
    pub user_id: String,
    /// Actor display name, snapshotted at write time.
    pub user_name: String,
    /// Actor role, snapshotted at write time.
    pub user_role: String,
    /// The action performed (e.g., `"file.upload"`).
    pub action: String,
    /// Functional category.
    pub category: AuditCategory,
    /// Free-text description of the target.
    pub target: String,
    /// Event severity.
    pub severity: Severity,
    /// Whether the action succeeded.
    pub status: AuditOutcome,
    /// IP address of the actor, if known.
    pub ip: Option<String>,
    /// User-Agent of the actor, if known.
    pub user_agent: Option<String>,
    /// Correlating request ID, if any.
    pub request_id: Option<Uuid>,
    /// Free-form metadata (includes the identity snapshot).
    pub metadata: serde_json::Value,
}

impl FromRow<'_, PgRow> for AuditLogEntry {
    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        fn parse_column<T: std::str::FromStr>(
            row: &PgRow,
            column: &'static str,
        ) -> Result<T, sqlx::Error>
        where
            T::Err: std::error::Error + Send + Sync + 'static,
        {
            let raw: String = row.try_get(column)?;
            raw.parse::<T>().map_err(|e| sqlx::Error::ColumnDecode {
                index: column.into(),
                source: Box::new(e),
            })
        }

        let metadata: serde_json::Value = row.try_get("metadata")?;
        let snapshot_field = |key: &str| -> String {
            metadata
                .get(key)
                .and_then(serde_json::Value::as_str)
                .unwrap_or(UNKNOWN)
                .to_string()
        };

        Ok(Self {
            id: row.try_get("id")?,
            created_at: row.try_get("created_at")?,
            user_id: row.try_get("user_id")?,
            user_name: snapshot_field("userName"),
            user_role: snapshot_field("userRole"),
            action: row.try_get("action")?,
            category: parse_column(row, "category")?,
            target: row.try_get("target")?,
            severity: parse_column(row, "severity")?,
            status: parse_column(row, "status")?,
            ip: row.try_get("ip")?,
            user_agent: row.try_get("user_agent")?,
            request_id: row.try_get("request_id")?,
            metadata,
        })
    }
}

/// Data required to append a new audit log entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAuditLogEntry {
    /// The acting user's ID; `"unknown"` when unattributed.
    pub user_id: String,
    /// Actor display name (snapshotted into metadata).
    pub user_name: String,
    /// Actor role (snapshotted into metadata).
    pub user_role: String,
    /// The action performed.
    pub action: String,
    /// Functional category.
    pub category: AuditCategory,
    /// Free-text description of the target.
    pub target: String,
    /// Event severity.
    pub severity: Severity,
    /// Whether the action succeeded.
    pub status: AuditOutcome,
    /// Actor's IP address.
    pub ip: Option<String>,
    /// Actor's User-Agent.
    pub user_agent: Option<String>,
    /// Correlating request ID.
    pub request_id: Option<Uuid>,
    /// Additional free-form metadata.
    pub metadata: serde_json::Value,
}

impl CreateAuditLogEntry {
    /// Fold the identity snapshot into the metadata bag for storage.
    pub fn metadata_with_snapshot(&self) -> serde_json::Value {
        let mut bag = match &self.metadata {
            serde_json::Value::Object(map) => map.clone(),
            _ => serde_json::Map::new(),
        };
        bag.insert("userName".into(), self.user_name.clone().into());
        bag.insert("userRole".into(), self.user_role.clone().into());
        serde_json::Value::Object(bag)
    }
}
