//! Document node entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgRow;
use sqlx::{FromRow, Row};
use uuid::Uuid;

use super::kind::DocumentKind;
use super::metadata::CertificateMetadata;

/// Sentinel storage path for folder rows, which never carry a physical
/// object.
pub const FOLDER_STORAGE_PATH: &str = "system/folder";

/// A node in the document tree: either a certificate file or a folder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentNode {
    /// Unique node identifier.
    pub id: Uuid,
    /// Parent folder ID (None for root-level nodes).
    pub parent_id: Option<Uuid>,
    /// Display name.
    pub name: String,
    /// Node kind (folder, pdf, image, other).
    pub kind: DocumentKind,
    /// Human-readable size (e.g., `"1.2 MB"`, `"-"` for folders).
    pub size: String,
    /// When the node was last updated.
    pub updated_at: DateTime<Utc>,
    /// The owning organization.
    pub owner_id: Uuid,
    /// Object storage locator; [`FOLDER_STORAGE_PATH`] for folders.
    pub storage_path: String,
    /// Document version, starting at 1.
    pub version_number: i32,
    /// Certificate metadata, normalized on read.
    pub metadata: CertificateMetadata,
}

impl DocumentNode {
    /// Whether this node is a folder (and thus has no physical object).
    pub fn is_folder(&self) -> bool {
        self.kind.is_folder() || self.storage_path == FOLDER_STORAGE_PATH
    }
}

impl FromRow<'_, PgRow> for DocumentNode {
    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        let kind: String = row.try_get("kind")?;
        let kind = kind
            .parse::<DocumentKind>()
            .map_err(|e| sqlx::Error::ColumnDecode {
                index: "kind".into(),
                source: Box::new(e),
            })?;

        let metadata: serde_json::Value = row.try_get("metadata")?;

        Ok(Self {
            id: row.try_get("id")?,
            parent_id: row.try_get("parent_id")?,
            name: row.try_get("name")?,
            kind,
            size: row.try_get("size")?,
            updated_at: row.try_get("updated_at")?,
            owner_id: row.try_get("owner_id")?,
            storage_path: row.try_get("storage_path")?,
            version_number: row.try_get("version_number")?,
            metadata: CertificateMetadata::normalize(metadata),
        })
    }
}

/// Data required to create a new document node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewDocument {
    /// Parent folder (None for root-level).
    pub parent_id: Option<Uuid>,
    /// Display name.
    pub name: String,
    /// Node kind.
    pub kind: DocumentKind,
    /// Human-readable size.
    pub size: String,
    /// The owning organization.
    pub owner_id: Uuid,
    /// Object storage locator; [`FOLDER_STORAGE_PATH`] for folders.
    pub storage_path: String,
    /// Certificate metadata.
    pub metadata: CertificateMetadata,
}

impl NewDocument {
    /// Build a folder row: sentinel storage path, no physical object.
    pub fn folder(
        parent_id: Option<Uuid>,
        name: impl Into<String>,
        owner_id: Uuid,
        metadata: CertificateMetadata,
    ) -> Self {
        Self {
            parent_id,
            name: name.into(),
            kind: DocumentKind::Folder,
            size: "-".to_string(),
            owner_id,
            storage_path: FOLDER_STORAGE_PATH.to_string(),
            metadata,
        }
    }
}
