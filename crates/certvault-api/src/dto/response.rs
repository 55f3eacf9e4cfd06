//! Response DTOs.

use serde::Serialize;

/// Standard error payload.
#[derive(Debug, Clone, Serialize)]
pub struct ApiErrorResponse {
    /// Machine-readable error code (e.g., `"NOT_FOUND"`).
    pub error: String,
    /// Human-readable message.
    pub message: String,
}
