//! Request context carrying the authenticated user and their scope.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use certvault_core::error::AppError;
use certvault_core::result::AppResult;
use certvault_entity::user::Role;

/// Context for the current authenticated request.
///
/// Extracted at the HTTP boundary and passed into service methods so that
/// every operation knows *who* is acting and for *which* organization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The authenticated user's ID (external identity subject).
    pub user_id: String,
    /// The user's display name.
    pub user_name: String,
    /// The user's role.
    pub role: Role,
    /// The user's organization, when one is resolved.
    pub organization_id: Option<Uuid>,
    /// IP address of the request origin.
    pub ip: Option<String>,
    /// User-Agent header value.
    pub user_agent: Option<String>,
    /// Correlating request ID.
    pub request_id: Option<Uuid>,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a new request context.
    pub fn new(
        user_id: impl Into<String>,
        user_name: impl Into<String>,
        role: Role,
        organization_id: Option<Uuid>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            user_name: user_name.into(),
            role,
            organization_id,
            ip: None,
            user_agent: None,
            request_id: None,
            request_time: Utc::now(),
        }
    }

    /// Returns whether the current user is an admin.
    pub fn is_admin(&self) -> bool {
        matches!(self.role, Role::Admin)
    }

    /// Resolve the owner scope for a listing.
    ///
    /// Client-role callers are always constrained to their own
    /// organization, regardless of what they asked for; a client without
    /// a resolved organization cannot list at all. Other roles may pass
    /// an explicit scope or omit it for the global view.
    pub fn effective_owner_scope(&self, requested: Option<Uuid>) -> AppResult<Option<Uuid>> {
        if self.role.can_see_global_scope() {
            return Ok(requested);
        }
        let own = self.organization_id.ok_or_else(|| {
            AppError::validation("No organization resolved for client account")
        })?;
        Ok(Some(own))
    }

    /// Resolve the owning organization for a mutation (upload, folder
    /// creation). A missing owner is a terminal validation error; the
    /// backend is never called.
    pub fn resolve_mutation_owner(&self, requested: Option<Uuid>) -> AppResult<Uuid> {
        if let Some(owner) = requested {
            if !self.role.can_see_global_scope()
                && self.organization_id.is_some_and(|own| own != owner)
            {
                return Err(AppError::forbidden(
                    "Clients may only write into their own organization",
                ));
            }
            return Ok(owner);
        }
        self.organization_id.ok_or_else(|| {
            AppError::validation("No owner organization resolved for this operation")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_scope_is_forced_to_own_organization() {
        let org = Uuid::new_v4();
        let other = Uuid::new_v4();
        let ctx = RequestContext::new("u-1", "Client User", Role::Client, Some(org));

        assert_eq!(ctx.effective_owner_scope(None).unwrap(), Some(org));
        assert_eq!(ctx.effective_owner_scope(Some(other)).unwrap(), Some(org));
    }

    #[test]
    fn test_client_without_organization_cannot_list() {
        let ctx = RequestContext::new("u-1", "Client User", Role::Client, None);
        assert!(ctx.effective_owner_scope(None).is_err());
    }

    #[test]
    fn test_admin_scope_passes_through() {
        let org = Uuid::new_v4();
        let ctx = RequestContext::new("u-2", "Admin", Role::Admin, None);
        assert_eq!(ctx.effective_owner_scope(None).unwrap(), None);
        assert_eq!(ctx.effective_owner_scope(Some(org)).unwrap(), Some(org));
    }

    #[test]
    fn test_mutation_owner_requires_resolution() {
        let ctx = RequestContext::new("u-3", "Quality", Role::Quality, None);
        assert!(ctx.resolve_mutation_owner(None).is_err());

        let org = Uuid::new_v4();
        assert_eq!(ctx.resolve_mutation_owner(Some(org)).unwrap(), org);
    }

    #[test]
    fn test_client_cannot_write_into_foreign_organization() {
        let org = Uuid::new_v4();
        let other = Uuid::new_v4();
        let ctx = RequestContext::new("u-4", "Client", Role::Client, Some(org));
        assert!(ctx.resolve_mutation_owner(Some(other)).is_err());
        assert_eq!(ctx.resolve_mutation_owner(Some(org)).unwrap(), org);
        assert_eq!(ctx.resolve_mutation_owner(None).unwrap(), org);
    }
}
