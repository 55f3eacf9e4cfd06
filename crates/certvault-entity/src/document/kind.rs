//! Document kind enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The kind of a document node.
///
/// Folders and files live in the same table; `Folder` rows carry the
/// sentinel storage path and never a physical object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DocumentKind {
    /// A folder grouping other nodes.
    Folder,
    /// A PDF certificate document.
    Pdf,
    /// An image (scan or photo evidence).
    Image,
    /// Any other file type.
    Other,
}

impl DocumentKind {
    /// Whether this node is a folder.
    pub fn is_folder(&self) -> bool {
        matches!(self, Self::Folder)
    }

    /// Classify a file by its name's extension. Never returns `Folder`.
    pub fn from_file_name(name: &str) -> Self {
        let ext = name
            .rsplit_once('.')
            .map(|(_, e)| e.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "pdf" => Self::Pdf,
            "png" | "jpg" | "jpeg" | "gif" | "webp" | "bmp" | "tiff" => Self::Image,
            _ => Self::Other,
        }
    }

    /// Return the kind as a lowercase string (database representation).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Folder => "folder",
            Self::Pdf => "pdf",
            Self::Image => "image",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DocumentKind {
    type Err = certvault_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "folder" => Ok(Self::Folder),
            "pdf" => Ok(Self::Pdf),
            "image" => Ok(Self::Image),
            "other" => Ok(Self::Other),
            _ => Err(certvault_core::AppError::validation(format!(
                "Invalid document kind: '{s}'. Expected one of: folder, pdf, image, other"
            ))),
        }
    }
}
