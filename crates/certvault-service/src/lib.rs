//! # certvault-service
//!
//! Business logic for CertVault: the explorer session layer (fetch-race
//! guard, debounced search, paginated listing, breadcrumb resolution),
//! audit correlation, document mutations, and best-effort audit
//! recording.

pub mod audit;
pub mod context;
pub mod document;
pub mod explorer;
pub mod store;

pub use context::RequestContext;
