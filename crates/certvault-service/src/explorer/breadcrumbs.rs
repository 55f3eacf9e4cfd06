//! Breadcrumb trail resolution.
//!
//! The trail is rebuilt from scratch by walking parent pointers upward
//! from the current folder. The walk is depth-bounded so a corrupt or
//! cyclic parent chain degrades to a truncated trail instead of hanging,
//! and every trail starts with a synthetic role-specific root crumb.

use std::sync::Arc;

use uuid::Uuid;

use crate::store::DocumentStore;
use certvault_entity::breadcrumb::Breadcrumb;
use certvault_entity::user::Role;

/// Resolves breadcrumb trails against the document store.
#[derive(Debug, Clone)]
pub struct BreadcrumbResolver {
    store: Arc<dyn DocumentStore>,
    depth_limit: usize,
}

impl BreadcrumbResolver {
    pub fn new(store: Arc<dyn DocumentStore>, depth_limit: usize) -> Self {
        Self { store, depth_limit }
    }

    /// Resolve the trail for a folder, root crumb first.
    ///
    /// `None` means the root level: the trail is just the synthetic
    /// root crumb. Resolution is best-effort: a missing ancestor or a
    /// lookup failure truncates the walk rather than failing the view.
    pub async fn resolve(&self, role: Role, folder_id: Option<Uuid>) -> Vec<Breadcrumb> {
        let mut trail = Vec::new();
        let mut cursor = folder_id;
        let mut hops = 0;

        while let Some(id) = cursor {
            if hops >= self.depth_limit {
                tracing::warn!(folder_id = %id, "Breadcrumb walk hit depth limit, truncating");
                break;
            }
            match self.store.breadcrumb_row(id).await {
                Ok(Some(row)) => {
                    trail.push(Breadcrumb {
                        id: Some(row.id),
                        name: row.name,
                    });
                    cursor = row.parent_id;
                }
                Ok(None) => break,
                Err(e) => {
                    tracing::warn!(folder_id = %id, error = %e, "Breadcrumb lookup failed");
                    break;
                }
            }
            hops += 1;
        }

        trail.push(Breadcrumb::root(role.root_label()));
        trail.reverse();
        trail
    }
}
