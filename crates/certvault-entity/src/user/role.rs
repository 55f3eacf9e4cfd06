//! User role enumeration and capability table.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Roles available in the console.
///
/// Role behavior lives in this capability table rather than in scattered
/// equality checks: scope visibility, the logical root label, and the
/// route prefixes a role may reach are all answered here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Full administrator: global scope, audit access.
    Admin,
    /// Quality analyst: global scope, review verdicts.
    Quality,
    /// Partner client: sees only its own organization's documents.
    Client,
}

impl Role {
    /// Whether this role may see documents outside its own organization.
    pub fn can_see_global_scope(&self) -> bool {
        !matches!(self, Self::Client)
    }

    /// Whether this role may read the audit log.
    pub fn can_view_audit_log(&self) -> bool {
        matches!(self, Self::Admin)
    }

    /// Whether this role may change a document's inspection status.
    pub fn can_set_inspection_status(&self) -> bool {
        matches!(self, Self::Admin | Self::Quality)
    }

    /// Label of the logical root folder shown to this role.
    pub fn root_label(&self) -> &'static str {
        match self {
            Self::Admin => "All documents",
            Self::Quality => "Quality review",
            Self::Client => "My certificates",
        }
    }

    /// Route prefixes this role is allowed to reach.
    pub fn allowed_route_prefixes(&self) -> &'static [&'static str] {
        match self {
            Self::Admin => &["/api/documents", "/api/explorer", "/api/audit"],
            Self::Quality => &["/api/documents", "/api/explorer"],
            Self::Client => &["/api/documents", "/api/explorer"],
        }
    }

    /// Return the role as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Quality => "quality",
            Self::Client => "client",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Role {
    type Err = certvault_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "quality" => Ok(Self::Quality),
            "client" => Ok(Self::Client),
            _ => Err(certvault_core::AppError::validation(format!(
                "Invalid role: '{s}'. Expected one of: admin, quality, client"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_capability() {
        assert!(Role::Admin.can_see_global_scope());
        assert!(Role::Quality.can_see_global_scope());
        assert!(!Role::Client.can_see_global_scope());
    }

    #[test]
    fn test_audit_capability() {
        assert!(Role::Admin.can_view_audit_log());
        assert!(!Role::Quality.can_view_audit_log());
        assert!(!Role::Client.can_view_audit_log());
    }

    #[test]
    fn test_root_labels_are_distinct() {
        assert_ne!(Role::Admin.root_label(), Role::Client.root_label());
        assert_ne!(Role::Quality.root_label(), Role::Client.root_label());
    }

    #[test]
    fn test_from_str() {
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!("CLIENT".parse::<Role>().unwrap(), Role::Client);
        assert!("viewer".parse::<Role>().is_err());
    }
}
