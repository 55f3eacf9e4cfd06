//! Application state shared across all handlers.

use std::sync::Arc;

use sqlx::PgPool;

use certvault_core::config::AppConfig;
use certvault_core::traits::ObjectStore;
use certvault_service::audit::AuditService;
use certvault_service::document::DocumentService;
use certvault_service::explorer::ExplorerRegistry;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`. All fields are
/// `Arc`-wrapped (or internally Arc'd) for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// PostgreSQL connection pool.
    pub db_pool: PgPool,
    /// Object storage provider.
    pub object_store: Arc<dyn ObjectStore>,
    /// Document reads and mutations.
    pub document_service: DocumentService,
    /// Audit recording, search, correlation.
    pub audit_service: AuditService,
    /// Open explorer sessions.
    pub explorer: Arc<ExplorerRegistry>,
}
