//! The explorer session.
//!
//! One session per open console view. It owns the view state (folder,
//! page, search term, current entries) and serializes state changes
//! through a single mutex, while fetches run outside the lock and apply
//! their results only when their ticket is still current.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::explorer::breadcrumbs::BreadcrumbResolver;
use crate::explorer::debounce::SearchDebouncer;
use crate::explorer::race::TicketCounter;
use crate::store::DocumentStore;
use certvault_core::types::PageRequest;
use certvault_entity::breadcrumb::Breadcrumb;
use certvault_entity::document::{DocumentNode, ListQuery};
use certvault_entity::user::Role;

/// Message shown instead of backend error details when a listing fails.
const LISTING_FAILED: &str = "Could not load documents";

/// Snapshot of a session's view state.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExplorerView {
    pub folder_id: Option<Uuid>,
    pub page: u64,
    pub search: String,
    pub entries: Vec<DocumentNode>,
    pub total: u64,
    pub has_more: bool,
    pub breadcrumbs: Vec<Breadcrumb>,
    pub loading: bool,
    pub last_error: Option<String>,
}

/// A stateful explorer session for one console view.
#[derive(Debug)]
pub struct ExplorerSession {
    store: Arc<dyn DocumentStore>,
    breadcrumbs: BreadcrumbResolver,
    role: Role,
    owner_scope: Option<Uuid>,
    page_size: u64,
    tickets: TicketCounter,
    view: Mutex<ExplorerView>,
}

impl ExplorerSession {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        role: Role,
        owner_scope: Option<Uuid>,
        page_size: u64,
        breadcrumb_depth_limit: usize,
    ) -> Arc<Self> {
        let breadcrumbs = BreadcrumbResolver::new(Arc::clone(&store), breadcrumb_depth_limit);
        Arc::new(Self {
            store,
            breadcrumbs,
            role,
            owner_scope,
            page_size,
            tickets: TicketCounter::new(),
            view: Mutex::new(ExplorerView {
                folder_id: None,
                page: 1,
                search: String::new(),
                entries: Vec::new(),
                total: 0,
                has_more: false,
                breadcrumbs: vec![Breadcrumb::root(role.root_label())],
                loading: false,
                last_error: None,
            }),
        })
    }

    /// Enter a folder (`None` returns to the root level). Resets to the
    /// first page and rebuilds the breadcrumb trail.
    pub async fn navigate_to(&self, folder_id: Option<Uuid>) {
        self.reload(
            |view| {
                view.folder_id = folder_id;
                view.page = 1;
            },
            true,
        )
        .await;

        let trail = self.breadcrumbs.resolve(self.role, folder_id).await;
        let mut view = self.view.lock().await;
        if view.folder_id == folder_id {
            view.breadcrumbs = trail;
        }
    }

    /// Jump to a page of the current listing.
    pub async fn set_page(&self, page: u64) {
        self.reload(|view| view.page = page, false).await;
    }

    /// Apply a committed search term. Called by the debounce pump; an
    /// empty term returns to folder browsing. Always resets to page one.
    pub async fn commit_search(&self, term: String) {
        self.reload(
            |view| {
                view.search = term;
                view.page = 1;
            },
            true,
        )
        .await;
    }

    /// Re-fetch the current view from the first page. Called after any
    /// mutation so the listing reflects the change.
    pub async fn refresh(&self) {
        self.reload(|view| view.page = 1, true).await;
    }

    /// Clone the current view state.
    pub async fn view(&self) -> ExplorerView {
        self.view.lock().await.clone()
    }

    /// Wire up a debounced search input feeding this session.
    pub fn searcher(self: &Arc<Self>, quiet: Duration) -> SearchInput {
        let (debouncer, mut commits) = SearchDebouncer::new(quiet);
        let session = Arc::clone(self);
        let pump = tokio::spawn(async move {
            while let Some(term) = commits.recv().await {
                session.commit_search(term).await;
            }
        });
        SearchInput { debouncer, pump }
    }

    /// Apply input changes under the lock, take a ticket, fetch outside
    /// the lock, then apply the result only if the ticket is still the
    /// most recently issued one.
    async fn reload<F>(&self, apply_inputs: F, reset_on_error: bool)
    where
        F: FnOnce(&mut ExplorerView),
    {
        let (ticket, query) = {
            let mut view = self.view.lock().await;
            apply_inputs(&mut view);
            view.loading = true;
            let ticket = self.tickets.issue();
            let query = ListQuery {
                folder_id: view.folder_id,
                search: view.search.clone(),
                owner_scope: self.owner_scope,
                page: PageRequest::new(view.page, self.page_size),
            };
            (ticket, query)
        };

        let result = self.store.list(&query).await;

        let mut view = self.view.lock().await;
        if !self.tickets.is_current(ticket) {
            // Superseded: a newer fetch owns the view now.
            return;
        }
        view.loading = false;
        match result {
            Ok(listing) => {
                view.entries = listing.items;
                view.total = listing.total;
                view.has_more = listing.has_more;
                view.last_error = None;
            }
            Err(e) => {
                tracing::error!(error = %e, "Explorer listing failed");
                view.last_error = Some(LISTING_FAILED.to_string());
                if reset_on_error {
                    view.entries.clear();
                    view.total = 0;
                    view.has_more = false;
                }
            }
        }
    }
}

/// Debounced search input bound to a session.
///
/// Dropping it aborts the pump task, so pending timers can never commit
/// into a closed session.
#[derive(Debug)]
pub struct SearchInput {
    debouncer: SearchDebouncer,
    pump: JoinHandle<()>,
}

impl SearchInput {
    /// Record a keystroke with the full current term.
    pub fn keystroke(&self, term: impl Into<String>) {
        self.debouncer.input(term);
    }
}

impl Drop for SearchInput {
    fn drop(&mut self) {
        self.pump.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::VecDeque;

    use async_trait::async_trait;
    use chrono::Utc;

    use certvault_core::error::AppError;
    use certvault_core::result::AppResult;
    use certvault_core::types::Paginated;
    use certvault_entity::breadcrumb::BreadcrumbRow;
    use certvault_entity::document::{
        CertificateMetadata, DocumentKind, InspectionStatus, NewDocument,
    };

    fn file_node(name: &str) -> DocumentNode {
        DocumentNode {
            id: Uuid::new_v4(),
            parent_id: None,
            name: name.to_string(),
            kind: DocumentKind::Pdf,
            size: "1.0 KB".to_string(),
            updated_at: Utc::now(),
            owner_id: Uuid::new_v4(),
            storage_path: format!("org/root/{name}"),
            version_number: 1,
            metadata: CertificateMetadata::normalize(serde_json::json!({})),
        }
    }

    fn page_of(names: &[&str]) -> Paginated<DocumentNode> {
        Paginated {
            items: names.iter().map(|n| file_node(n)).collect(),
            total: names.len() as u64,
            has_more: false,
        }
    }

    /// Fake store that answers `list` calls from a script of
    /// (delay, response) pairs, in call order.
    #[derive(Debug)]
    struct ScriptedStore {
        script: Mutex<VecDeque<(Duration, AppResult<Paginated<DocumentNode>>)>>,
    }

    impl ScriptedStore {
        fn new(
            script: impl IntoIterator<Item = (Duration, AppResult<Paginated<DocumentNode>>)>,
        ) -> Arc<Self> {
            Arc::new(Self {
                script: Mutex::new(script.into_iter().collect()),
            })
        }
    }

    #[async_trait]
    impl DocumentStore for ScriptedStore {
        async fn list(&self, _query: &ListQuery) -> AppResult<Paginated<DocumentNode>> {
            let (delay, response) = self
                .script
                .lock()
                .await
                .pop_front()
                .unwrap_or((Duration::ZERO, Ok(Paginated::empty())));
            tokio::time::sleep(delay).await;
            response
        }

        async fn find_by_id(&self, _id: Uuid) -> AppResult<Option<DocumentNode>> {
            unimplemented!()
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

    fn session(store: Arc<ScriptedStore>) -> Arc<ExplorerSession> {
        ExplorerSession::new(store, Role::Admin, None, 20, 8)
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_earlier_fetch_never_overwrites_newer_one() {
        let store = ScriptedStore::new([
            (Duration::from_millis(100), Ok(page_of(&["stale.pdf"]))),
            (Duration::from_millis(10), Ok(page_of(&["fresh.pdf"]))),
        ]);
        let session = session(store);

        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        tokio::join!(session.navigate_to(Some(a)), session.navigate_to(Some(b)));

        let view = session.view().await;
        assert_eq!(view.folder_id, Some(b));
        assert_eq!(view.entries.len(), 1);
        assert_eq!(view.entries[0].name, "fresh.pdf");
        assert!(!view.loading);
    }

    #[tokio::test(start_paused = true)]
    async fn test_listing_error_is_generic_and_resets_view() {
        let store = ScriptedStore::new([
            (Duration::ZERO, Ok(page_of(&["a.pdf"]))),
            (
                Duration::ZERO,
                Err(AppError::database("relation does not exist")),
            ),
        ]);
        let session = session(store);

        session.navigate_to(None).await;
        assert_eq!(session.view().await.entries.len(), 1);

        session.refresh().await;
        let view = session.view().await;
        assert_eq!(view.last_error.as_deref(), Some(LISTING_FAILED));
        assert!(view.entries.is_empty());
        assert_eq!(view.total, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_page_change_error_keeps_current_rows() {
        let store = ScriptedStore::new([
            (Duration::ZERO, Ok(page_of(&["a.pdf", "b.pdf"]))),
            (Duration::ZERO, Err(AppError::database("timeout"))),
        ]);
        let session = session(store);

        session.navigate_to(None).await;
        session.set_page(2).await;

        let view = session.view().await;
        assert_eq!(view.last_error.as_deref(), Some(LISTING_FAILED));
        assert_eq!(view.entries.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_debounced_keystrokes_commit_once_and_reset_page() {
        let store = ScriptedStore::new([
            (Duration::ZERO, Ok(page_of(&["a.pdf"]))),
            (Duration::ZERO, Ok(page_of(&["b.pdf"]))),
            (Duration::ZERO, Ok(page_of(&["lote-42.pdf"]))),
        ]);
        let session = session(store);
        session.navigate_to(None).await;
        session.set_page(3).await;

        let input = session.searcher(Duration::from_millis(300));
        input.keystroke("l");
        input.keystroke("lo");
        input.keystroke("lote");

        tokio::time::sleep(Duration::from_millis(500)).await;

        let view = session.view().await;
        assert_eq!(view.search, "lote");
        assert_eq!(view.page, 1);
        assert_eq!(view.entries.len(), 1);
        assert_eq!(view.entries[0].name, "lote-42.pdf");
    }

    #[tokio::test(start_paused = true)]
    async fn test_closed_search_input_cannot_commit() {
        let store = ScriptedStore::new([(Duration::ZERO, Ok(page_of(&["a.pdf"])))]);
        let session = session(store);
        session.navigate_to(None).await;

        let input = session.searcher(Duration::from_millis(300));
        input.keystroke("zz");
        drop(input);

        tokio::time::sleep(Duration::from_millis(500)).await;

        let view = session.view().await;
        assert_eq!(view.search, "");
        assert_eq!(view.entries.len(), 1);
    }
}
