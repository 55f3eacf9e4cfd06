//! # certvault-api
//!
//! HTTP API layer for CertVault built on Axum.
//!
//! Provides the REST endpoints for documents, explorer sessions, audit
//! queries, health checks, plus extractors, DTOs, CORS, and error
//! mapping.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod router;
pub mod state;

pub use app::{build_app, run_server};
pub use state::AppState;
