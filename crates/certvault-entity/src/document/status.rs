//! Inspection status (quality-review verdict) for certificate metadata.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The quality-review outcome attached to a document's metadata.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InspectionStatus {
    /// Awaiting review.
    #[default]
    Pending,
    /// Approved by a quality analyst.
    Approved,
    /// Rejected by a quality analyst.
    Rejected,
    /// Flagged for deletion.
    ToDelete,
}

impl InspectionStatus {
    /// Return the status in its wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Approved => "APPROVED",
            Self::Rejected => "REJECTED",
            Self::ToDelete => "TO_DELETE",
        }
    }
}

impl fmt::Display for InspectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for InspectionStatus {
    type Err = certvault_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "PENDING" => Ok(Self::Pending),
            "APPROVED" => Ok(Self::Approved),
            "REJECTED" => Ok(Self::Rejected),
            "TO_DELETE" => Ok(Self::ToDelete),
            _ => Err(certvault_core::AppError::validation(format!(
                "Invalid inspection status: '{s}'"
            ))),
        }
    }
}
