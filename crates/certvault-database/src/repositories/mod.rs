//! Concrete repository implementations over the PostgreSQL pool.

pub mod audit;
pub mod document;

pub use audit::AuditLogRepository;
pub use document::DocumentRepository;
