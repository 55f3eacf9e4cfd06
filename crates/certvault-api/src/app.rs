//! Application builder: wires repositories, services, router, and
//! state into a running Axum server.

use std::sync::Arc;

use axum::Router;
use sqlx::PgPool;
use tokio::net::TcpListener;

use certvault_core::config::AppConfig;
use certvault_core::error::AppError;
use certvault_core::traits::ObjectStore;
use certvault_database::repositories::{AuditLogRepository, DocumentRepository};
use certvault_service::audit::AuditService;
use certvault_service::document::DocumentService;
use certvault_service::explorer::ExplorerRegistry;
use certvault_service::store::{AuditStore, DocumentStore};

use crate::router::build_router;
use crate::state::AppState;

/// Build the Axum application from an already-constructed state.
pub fn build_app(state: AppState) -> Router {
    build_router(state)
}

/// Wire repositories and services into the shared application state.
pub fn build_state(
    config: Arc<AppConfig>,
    db_pool: PgPool,
    object_store: Arc<dyn ObjectStore>,
) -> AppState {
    let document_store: Arc<dyn DocumentStore> =
        Arc::new(DocumentRepository::new(db_pool.clone()));
    let audit_store: Arc<dyn AuditStore> = Arc::new(AuditLogRepository::new(db_pool.clone()));

    let audit_service = AuditService::new(audit_store);
    let document_service = DocumentService::new(
        Arc::clone(&document_store),
        Arc::clone(&object_store),
        audit_service.clone(),
    );
    let explorer = Arc::new(ExplorerRegistry::new(
        Arc::clone(&document_store),
        config.explorer.clone(),
    ));

    AppState {
        config,
        db_pool,
        object_store,
        document_service,
        audit_service,
        explorer,
    }
}

/// Run the CertVault server until shutdown is requested.
pub async fn run_server(
    config: AppConfig,
    db_pool: PgPool,
    object_store: Arc<dyn ObjectStore>,
) -> Result<(), AppError> {
    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let state = build_state(Arc::new(config), db_pool, object_store);
    let app = build_app(state);

    let listener = TcpListener::bind(&bind_addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {bind_addr}: {e}")))?;
    tracing::info!(addr = %bind_addr, "CertVault server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))
}

/// Resolve on Ctrl-C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl-C handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => tracing::error!(error = %e, "Failed to install SIGTERM handler"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Shutdown signal received");
}
