//! Audit log entities. Entries are append-only; this system never
//! mutates or deletes them.

pub mod model;
pub mod query;
pub mod severity;

pub use model::{AuditLogEntry, CreateAuditLogEntry};
pub use query::AuditSearchFilter;
pub use severity::{AuditCategory, AuditOutcome, Severity};
