//! File explorer behavior configuration.

use serde::{Deserialize, Serialize};

/// Settings governing the explorer session layer: pagination bounds,
/// search debounce, breadcrumb depth, and the admin call time budget.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExplorerConfig {
    /// Default number of entries per listing page.
    #[serde(default = "default_page_size")]
    pub page_size: u64,
    /// Quiet period before a typed search term is committed, in milliseconds.
    #[serde(default = "default_debounce_ms")]
    pub search_debounce_ms: u64,
    /// Maximum number of parent-chain hops when resolving breadcrumbs.
    /// Guards against cyclic or corrupted parent chains.
    #[serde(default = "default_breadcrumb_depth")]
    pub breadcrumb_depth_limit: usize,
    /// Time budget for bounded admin calls, in seconds.
    #[serde(default = "default_admin_timeout")]
    pub admin_call_timeout_seconds: u64,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            search_debounce_ms: default_debounce_ms(),
            breadcrumb_depth_limit: default_breadcrumb_depth(),
            admin_call_timeout_seconds: default_admin_timeout(),
        }
    }
}

fn default_page_size() -> u64 {
    20
}

fn default_debounce_ms() -> u64 {
    300
}

fn default_breadcrumb_depth() -> usize {
    8
}

fn default_admin_timeout() -> u64 {
    10
}
