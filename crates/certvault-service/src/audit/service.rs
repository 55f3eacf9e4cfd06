//! Audit service: best-effort recording, searching, correlation.

use std::sync::Arc;

use uuid::Uuid;

use crate::audit::correlate::{Correlation, correlate};
use crate::context::RequestContext;
use crate::store::AuditStore;
use certvault_core::error::AppError;
use certvault_core::result::AppResult;
use certvault_core::types::{PageRequest, Paginated};
use certvault_entity::audit::{
    AuditCategory, AuditLogEntry, AuditOutcome, AuditSearchFilter, CreateAuditLogEntry, Severity,
};

/// Placeholder identity for unattributed actions.
const UNKNOWN: &str = "unknown";

/// How many recent entries to scan when correlating an event.
const CORRELATION_WINDOW: u64 = 500;

/// Audit log service.
#[derive(Debug, Clone)]
pub struct AuditService {
    store: Arc<dyn AuditStore>,
}

impl AuditService {
    pub fn new(store: Arc<dyn AuditStore>) -> Self {
        Self { store }
    }

    /// Append an entry, best-effort. Audit failures are logged and
    /// swallowed: they must never fail the user-facing operation they
    /// describe.
    pub async fn record(&self, entry: CreateAuditLogEntry) {
        if let Err(e) = self.store.append(&entry).await {
            tracing::error!(
                action = %entry.action,
                target = %entry.target,
                error = %e,
                "Failed to write audit entry"
            );
        }
    }

    /// Record a data-plane action by an (optionally attributed) actor.
    pub async fn record_action(
        &self,
        actor: Option<&RequestContext>,
        action: &str,
        target: &str,
        severity: Severity,
        status: AuditOutcome,
        metadata: serde_json::Value,
    ) {
        let entry = match actor {
            Some(ctx) => CreateAuditLogEntry {
                user_id: ctx.user_id.clone(),
                user_name: ctx.user_name.clone(),
                user_role: ctx.role.as_str().to_string(),
                action: action.to_string(),
                category: AuditCategory::Data,
                target: target.to_string(),
                severity,
                status,
                ip: ctx.ip.clone(),
                user_agent: ctx.user_agent.clone(),
                request_id: ctx.request_id,
                metadata,
            },
            None => CreateAuditLogEntry {
                user_id: UNKNOWN.to_string(),
                user_name: UNKNOWN.to_string(),
                user_role: UNKNOWN.to_string(),
                action: action.to_string(),
                category: AuditCategory::Data,
                target: target.to_string(),
                severity,
                status,
                ip: None,
                user_agent: None,
                request_id: None,
                metadata,
            },
        };
        self.record(entry).await;
    }

    /// Search the audit log. Admin only.
    pub async fn search(
        &self,
        ctx: &RequestContext,
        filter: &AuditSearchFilter,
        page: &PageRequest,
    ) -> AppResult<Paginated<AuditLogEntry>> {
        self.require_viewer(ctx)?;
        self.store.search(filter, page).await
    }

    /// Fetch a single entry. Admin only.
    pub async fn entry(&self, ctx: &RequestContext, id: Uuid) -> AppResult<AuditLogEntry> {
        self.require_viewer(ctx)?;
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Audit entry {id} not found")))
    }

    /// Correlate an entry against the recent window. Admin only.
    pub async fn correlate(
        &self,
        ctx: &RequestContext,
        id: Uuid,
    ) -> AppResult<(AuditLogEntry, Correlation)> {
        self.require_viewer(ctx)?;
        let target = self
            .store
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Audit entry {id} not found")))?;
        let window = self.store.recent(CORRELATION_WINDOW).await?;
        let correlation = correlate(&target, &window);
        Ok((target, correlation))
    }

    fn require_viewer(&self, ctx: &RequestContext) -> AppResult<()> {
        if !ctx.role.can_view_audit_log() {
            return Err(AppError::forbidden("Audit log access requires admin role"));
        }
        Ok(())
    }
}
