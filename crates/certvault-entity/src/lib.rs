//! # certvault-entity
//!
//! Domain entities for CertVault: document nodes (files and folders),
//! steel certificate metadata, audit log entries, breadcrumbs, and user
//! roles with their capability table.

pub mod audit;
pub mod breadcrumb;
pub mod document;
pub mod user;
