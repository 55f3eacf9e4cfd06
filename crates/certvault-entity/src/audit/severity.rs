//! Audit severity, category, and outcome enumerations.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Severity of an audit event, ordered from least to most severe.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    /// Routine activity.
    Info,
    /// Unusual but non-failing activity.
    Warning,
    /// A failed operation.
    Error,
    /// A security-relevant failure or violation.
    Critical,
}

impl Severity {
    /// Ordinal position used for severity comparisons.
    pub fn ordinal(&self) -> u8 {
        match self {
            Self::Info => 0,
            Self::Warning => 1,
            Self::Error => 2,
            Self::Critical => 3,
        }
    }

    /// Wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
            Self::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Severity {
    type Err = certvault_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "INFO" => Ok(Self::Info),
            "WARNING" => Ok(Self::Warning),
            "ERROR" => Ok(Self::Error),
            "CRITICAL" => Ok(Self::Critical),
            _ => Err(certvault_core::AppError::validation(format!(
                "Invalid severity: '{s}'"
            ))),
        }
    }
}

/// Functional category of an audit event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AuditCategory {
    /// Login, logout, session events.
    Auth,
    /// Document and metadata changes.
    Data,
    /// Configuration and maintenance events.
    System,
    /// Access violations and suspicious activity.
    Security,
}

impl AuditCategory {
    /// Wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Auth => "AUTH",
            Self::Data => "DATA",
            Self::System => "SYSTEM",
            Self::Security => "SECURITY",
        }
    }
}

impl fmt::Display for AuditCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AuditCategory {
    type Err = certvault_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "AUTH" => Ok(Self::Auth),
            "DATA" => Ok(Self::Data),
            "SYSTEM" => Ok(Self::System),
            "SECURITY" => Ok(Self::Security),
            _ => Err(certvault_core::AppError::validation(format!(
                "Invalid audit category: '{s}'"
            ))),
        }
    }
}

/// Outcome of the audited action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AuditOutcome {
    /// The action succeeded.
    Success,
    /// The action failed.
    Failure,
}

impl AuditOutcome {
    /// Wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "SUCCESS",
            Self::Failure => "FAILURE",
        }
    }
}

impl fmt::Display for AuditOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AuditOutcome {
    type Err = certvault_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "SUCCESS" => Ok(Self::Success),
            "FAILURE" => Ok(Self::Failure),
            _ => Err(certvault_core::AppError::validation(format!(
                "Invalid audit outcome: '{s}'"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Critical > Severity::Error);
        assert!(Severity::Error > Severity::Warning);
        assert!(Severity::Warning > Severity::Info);
        assert_eq!(Severity::Critical.ordinal(), 3);
    }

    #[test]
    fn test_round_trips() {
        assert_eq!("critical".parse::<Severity>().unwrap(), Severity::Critical);
        assert_eq!("DATA".parse::<AuditCategory>().unwrap(), AuditCategory::Data);
        assert_eq!(
            "failure".parse::<AuditOutcome>().unwrap(),
            AuditOutcome::Failure
        );
        assert!("fatal".parse::<Severity>().is_err());
    }
}
