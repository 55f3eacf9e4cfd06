//! Pagination query parameter extractor.

use serde::{Deserialize, Serialize};

use certvault_core::types::PageRequest;

/// Query parameters for paginated endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationParams {
    /// Page number (1-based, default 1).
    #[serde(default = "default_page")]
    pub page: u64,
    /// Items per page.
    pub page_size: Option<u64>,
}

fn default_page() -> u64 {
    1
}

impl PaginationParams {
    /// Convert to a clamped `PageRequest`, falling back to the
    /// configured default page size.
    pub fn into_page_request(self, default_page_size: u64) -> PageRequest {
        PageRequest::new(self.page, self.page_size.unwrap_or(default_page_size))
    }
}
