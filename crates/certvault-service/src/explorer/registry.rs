//! Registry of open explorer sessions, keyed by session ID.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use uuid::Uuid;

use crate::context::RequestContext;
use crate::explorer::session::{ExplorerSession, SearchInput};
use crate::store::DocumentStore;
use certvault_core::config::explorer::ExplorerConfig;
use certvault_core::error::AppError;
use certvault_core::result::AppResult;

struct SessionEntry {
    session: Arc<ExplorerSession>,
    search: SearchInput,
    owner: String,
}

/// Concurrent map of open explorer sessions.
///
/// A session is only visible to the user who opened it; lookups by any
/// other caller answer as if the session did not exist, so a leaked
/// session ID cannot be used to read another user's view.
pub struct ExplorerRegistry {
    store: Arc<dyn DocumentStore>,
    config: ExplorerConfig,
    sessions: DashMap<Uuid, SessionEntry>,
}

impl ExplorerRegistry {
    pub fn new(store: Arc<dyn DocumentStore>, config: ExplorerConfig) -> Self {
        Self {
            store,
            config,
            sessions: DashMap::new(),
        }
    }

    /// Open a session scoped to the caller and load its root listing.
    pub async fn open(&self, ctx: &RequestContext) -> AppResult<Uuid> {
        let owner_scope = ctx.effective_owner_scope(None)?;
        let session = ExplorerSession::new(
            Arc::clone(&self.store),
            ctx.role,
            owner_scope,
            self.config.page_size,
            self.config.breadcrumb_depth_limit,
        );
        let search = session.searcher(Duration::from_millis(self.config.search_debounce_ms));
        session.navigate_to(None).await;

        let id = Uuid::new_v4();
        self.sessions.insert(
            id,
            SessionEntry {
                session,
                search,
                owner: ctx.user_id.clone(),
            },
        );
        Ok(id)
    }

    /// Look up one of the caller's open sessions.
    pub fn get(&self, ctx: &RequestContext, id: Uuid) -> AppResult<Arc<ExplorerSession>> {
        self.sessions
            .get(&id)
            .filter(|entry| entry.owner == ctx.user_id)
            .map(|entry| Arc::clone(&entry.session))
            .ok_or_else(|| AppError::not_found(format!("Explorer session {id} not found")))
    }

    /// Feed a search keystroke into one of the caller's sessions.
    pub fn keystroke(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        term: impl Into<String>,
    ) -> AppResult<()> {
        let entry = self
            .sessions
            .get(&id)
            .filter(|entry| entry.owner == ctx.user_id)
            .ok_or_else(|| AppError::not_found(format!("Explorer session {id} not found")))?;
        entry.search.keystroke(term);
        Ok(())
    }

    /// Close one of the caller's sessions. Dropping the entry aborts the
    /// debounce pump so no pending timer can commit afterwards.
    pub fn close(&self, ctx: &RequestContext, id: Uuid) -> bool {
        self.sessions
            .remove_if(&id, |_, entry| entry.owner == ctx.user_id)
            .is_some()
    }

    /// Number of open sessions.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

impl std::fmt::Debug for ExplorerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExplorerRegistry")
            .field("sessions", &self.sessions.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use async_trait::async_trait;

    use certvault_core::types::Paginated;
    use certvault_entity::breadcrumb::BreadcrumbRow;
    use certvault_entity::document::{DocumentNode, InspectionStatus, ListQuery, NewDocument};
    use certvault_entity::user::Role;

    #[derive(Debug)]
    struct EmptyStore;

    #[async_trait]
    impl DocumentStore for EmptyStore {
        async fn list(&self, _query: &ListQuery) -> AppResult<Paginated<DocumentNode>> {
            Ok(Paginated::empty())
        }

        async fn find_by_id(&self, _id: Uuid) -> AppResult<Option<DocumentNode>> {
            Ok(None)
        }

        async fn breadcrumb_row(&self, _id: Uuid) -> AppResult<Option<BreadcrumbRow>> {
            Ok(None)
        }

        async fn insert(&self, _doc: &NewDocument) -> AppResult<DocumentNode> {
            unimplemented!()
        }

        async fn rename(&self, _id: Uuid, _new_name: &str) -> AppResult<DocumentNode> {
            unimplemented!()
        }

        async fn set_status(
            &self,
            _id: Uuid,
            _status: InspectionStatus,
        ) -> AppResult<DocumentNode> {
            unimplemented!()
        }

        async fn delete(&self, _id: Uuid) -> AppResult<Option<DocumentNode>> {
            unimplemented!()
        }
    }

    fn registry() -> ExplorerRegistry {
        ExplorerRegistry::new(Arc::new(EmptyStore), ExplorerConfig::default())
    }

    #[tokio::test]
    async fn test_session_lifecycle_for_its_owner() {
        let registry = registry();
        let ana = RequestContext::new("u-ana", "Ana", Role::Admin, None);

        let id = registry.open(&ana).await.unwrap();
        assert!(registry.get(&ana, id).is_ok());
        assert!(registry.keystroke(&ana, id, "cert").is_ok());

        assert!(registry.close(&ana, id));
        assert!(registry.get(&ana, id).is_err());
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn test_foreign_session_id_answers_as_missing() {
        let registry = registry();
        let ana = RequestContext::new("u-ana", "Ana", Role::Admin, None);
        let bruno = RequestContext::new("u-bruno", "Bruno", Role::Admin, None);

        let id = registry.open(&ana).await.unwrap();

        assert!(registry.get(&bruno, id).is_err());
        assert!(registry.keystroke(&bruno, id, "cert").is_err());
        assert!(!registry.close(&bruno, id));

        // Still reachable for its owner.
        assert!(registry.get(&ana, id).is_ok());
        assert_eq!(registry.len(), 1);
    }
}
