//! Audit logging: best-effort recording, searching, and correlation.

pub mod correlate;
pub mod service;

pub use correlate::{Correlation, LogFilter, correlate, risk_score};
pub use service::AuditService;
